use serde::{Deserialize, Serialize};

/// Ternary outcome of one evaluation call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Allow,
    Warn,
    Block,
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Outcome::Allow => "allow",
            Outcome::Warn => "warn",
            Outcome::Block => "block",
        };
        f.write_str(s)
    }
}

/// Per-evaluation bookkeeping: how many rules were attempted vs. how many
/// violations were real vs. synthetic. Feeds the circuit breaker and audit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationStats {
    pub rules_attempted: usize,
    pub real_violations: usize,
    pub synthetic_violations: usize,
}

/// Terminal value of one evaluation call. Never mutated after construction.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub outcome: Outcome,
    pub reasons: Vec<String>,
    /// Set when the circuit breaker downgraded enforcement for this call.
    #[serde(default)]
    pub degraded_mode: bool,
    #[serde(default)]
    pub stats: EvaluationStats,
}

impl Decision {
    pub fn new(outcome: Outcome, reasons: Vec<String>) -> Self {
        Self {
            outcome,
            reasons,
            degraded_mode: false,
            stats: EvaluationStats::default(),
        }
    }
}
