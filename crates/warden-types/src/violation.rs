use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Severity of a policy violation.
///
/// Ordering follows declaration order: `Critical` sorts before `Low`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Severity::Critical => "critical",
            Severity::High => "high",
            Severity::Medium => "medium",
            Severity::Low => "low",
        };
        f.write_str(s)
    }
}

/// A single finding produced by rule evaluation.
///
/// Immutable once created; consumed only by the decision fold. A synthetic
/// violation with `is_evaluation_error = true` stands in for a rule that
/// failed instead of completing, so infrastructure failures are never
/// silently dropped.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    pub rule_id: String,
    pub severity: Severity,
    pub message: String,
    #[serde(default)]
    pub context: HashMap<String, serde_json::Value>,
    #[serde(default)]
    pub is_evaluation_error: bool,
}

impl Violation {
    /// Create a real policy violation.
    pub fn new(rule_id: impl Into<String>, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            rule_id: rule_id.into(),
            severity,
            message: message.into(),
            context: HashMap::new(),
            is_evaluation_error: false,
        }
    }

    /// Attach a context entry (builder style).
    pub fn with_context(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.context.insert(key.into(), value);
        self
    }

    /// Create the synthetic critical violation for a rule that errored.
    ///
    /// Carries the lifecycle phase in which the rule failed plus the
    /// underlying error's type and message, so operators can tell policy
    /// violations apart from infrastructure failures.
    pub fn evaluation_error(
        rule_id: impl Into<String>,
        phase: impl Into<String>,
        error_type: impl Into<String>,
        error_message: impl Into<String>,
    ) -> Self {
        let rule_id = rule_id.into();
        let error_type = error_type.into();
        let error_message = error_message.into();
        Self {
            rule_id: rule_id.clone(),
            severity: Severity::Critical,
            message: format!("rule {} failed during evaluation: {}", rule_id, error_message),
            context: HashMap::from([
                ("phase".to_string(), serde_json::Value::String(phase.into())),
                (
                    "error_type".to_string(),
                    serde_json::Value::String(error_type),
                ),
                (
                    "error_message".to_string(),
                    serde_json::Value::String(error_message),
                ),
            ]),
            is_evaluation_error: true,
        }
    }
}
