use thiserror::Error;
use warden_breaker::BreakerError;

/// Errors from an evaluation call.
///
/// Rule failures never surface here — they become synthetic violations in
/// the decision instead. Only infrastructure the engine cannot reason
/// around, like an unreachable breaker counter, aborts the call.
#[derive(Error, Debug)]
pub enum OracleError {
    #[error("circuit breaker error: {0}")]
    Breaker(#[from] BreakerError),
}
