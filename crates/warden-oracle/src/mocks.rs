//! Canned rules for tests and examples.

use async_trait::async_trait;

use crate::rule::{PolicyRule, RuleContext, RuleError};
use warden_types::{Severity, Violation};

/// A rule that always returns the same violations.
pub struct StaticRule {
    id: String,
    violations: Vec<Violation>,
}

impl StaticRule {
    /// A rule that never finds anything.
    pub fn allow_all(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            violations: vec![],
        }
    }

    /// A rule that always reports one violation of the given severity.
    pub fn violating(
        id: impl Into<String>,
        severity: Severity,
        message: impl Into<String>,
    ) -> Self {
        let id = id.into();
        let violation = Violation::new(id.clone(), severity, message);
        Self {
            id,
            violations: vec![violation],
        }
    }

    pub fn with_violations(id: impl Into<String>, violations: Vec<Violation>) -> Self {
        Self {
            id: id.into(),
            violations,
        }
    }
}

#[async_trait]
impl PolicyRule for StaticRule {
    fn id(&self) -> &str {
        &self.id
    }

    async fn evaluate(&self, _ctx: &RuleContext) -> Result<Vec<Violation>, RuleError> {
        Ok(self.violations.clone())
    }
}

/// A rule that always fails with the same error.
pub struct FailingRule {
    id: String,
    error: RuleError,
}

impl FailingRule {
    pub fn new(id: impl Into<String>, error: RuleError) -> Self {
        Self {
            id: id.into(),
            error,
        }
    }

    /// A rule that times out against its backing store.
    pub fn timing_out(id: impl Into<String>) -> Self {
        Self::new(
            id,
            RuleError::new("evaluate", "Timeout", "rule store unreachable"),
        )
    }
}

#[async_trait]
impl PolicyRule for FailingRule {
    fn id(&self) -> &str {
        &self.id
    }

    async fn evaluate(&self, _ctx: &RuleContext) -> Result<Vec<Violation>, RuleError> {
        Err(self.error.clone())
    }
}
