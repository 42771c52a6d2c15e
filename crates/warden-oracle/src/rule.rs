use std::collections::HashMap;

use async_trait::async_trait;
use thiserror::Error;

use warden_types::Violation;

/// A rule evaluation failure.
///
/// Carries the lifecycle phase the rule was in, the error's type name and
/// its message — everything the engine needs to synthesize the critical
/// violation that stands in for the missing result.
#[derive(Error, Debug, Clone)]
#[error("{kind} during {phase}: {message}")]
pub struct RuleError {
    pub phase: String,
    pub kind: String,
    pub message: String,
}

impl RuleError {
    pub fn new(
        phase: impl Into<String>,
        kind: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            phase: phase.into(),
            kind: kind.into(),
            message: message.into(),
        }
    }
}

/// What a rule sees: the organization under evaluation, the repository and
/// workflow text being judged, plus free-form metadata.
#[derive(Clone, Debug, Default)]
pub struct RuleContext {
    pub org_id: String,
    pub repository: String,
    pub workflow_text: String,
    pub metadata: HashMap<String, serde_json::Value>,
}

/// One policy rule.
///
/// Rules return every violation they find, or an error describing how they
/// failed. They never block or allow on their own — folding violations into
/// a decision is the engine's job.
#[async_trait]
pub trait PolicyRule: Send + Sync {
    /// Stable rule identifier, used for breaker buckets and calibration.
    fn id(&self) -> &str;

    async fn evaluate(&self, ctx: &RuleContext) -> Result<Vec<Violation>, RuleError>;
}
