use tracing::{debug, error};

use crate::checks::{
    ContentDigestCheck, ContractionWitnessCheck, DriftMagnitudeCheck, L0Check,
    LeastPrivilegeCheck, NonceFreshnessCheck,
};
use crate::input::{L0Config, L0Input};
use warden_types::L0Result;

/// L0 Validator — runs all five safety invariants as a hard gate.
///
/// All checks are evaluated on every call (no short-circuit), so a single
/// validation reports every failing invariant at once. The aggregate gate
/// is a simple conjunction.
pub struct L0Validator {
    checks: Vec<Box<dyn L0Check>>,
    config: L0Config,
}

impl L0Validator {
    /// Create a validator with all five L0 checks registered.
    pub fn new(config: L0Config) -> Self {
        let checks: Vec<Box<dyn L0Check>> = vec![
            Box::new(ContentDigestCheck),
            Box::new(LeastPrivilegeCheck),
            Box::new(DriftMagnitudeCheck),
            Box::new(NonceFreshnessCheck),
            Box::new(ContractionWitnessCheck),
        ];
        Self { checks, config }
    }

    pub fn config(&self) -> &L0Config {
        &self.config
    }

    /// Run every check, one result each, in registration order.
    pub fn validate(&self, input: &L0Input) -> Vec<L0Result> {
        self.checks
            .iter()
            .map(|check| {
                let result = check.check(input, &self.config);
                if result.passed {
                    debug!(id = check.id(), name = check.name(), "L0 check passed");
                } else {
                    error!(
                        id = check.id(),
                        name = check.name(),
                        message = %result.message,
                        "L0 CHECK FAILED"
                    );
                }
                result
            })
            .collect()
    }

    /// The hard gate: true only when every check passed.
    pub fn gate(results: &[L0Result]) -> bool {
        results.iter().all(|r| r.passed)
    }

    /// Number of registered checks.
    pub fn count(&self) -> usize {
        self.checks.len()
    }
}

impl Default for L0Validator {
    fn default() -> Self {
        Self::new(L0Config::default())
    }
}
