use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Result of one L0 invariant check.
///
/// A pure function of its inputs; there is no persisted lifecycle. Evidence
/// from failing checks is carried verbatim into the final decision's reasons.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct L0Result {
    pub invariant_id: String,
    pub passed: bool,
    pub message: String,
    #[serde(default)]
    pub evidence: HashMap<String, serde_json::Value>,
    /// Check duration in whole microseconds.
    pub latency_micros: u64,
}

impl L0Result {
    pub fn pass(invariant_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            invariant_id: invariant_id.into(),
            passed: true,
            message: message.into(),
            evidence: HashMap::new(),
            latency_micros: 0,
        }
    }

    pub fn fail(invariant_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            invariant_id: invariant_id.into(),
            passed: false,
            message: message.into(),
            evidence: HashMap::new(),
            latency_micros: 0,
        }
    }

    pub fn with_evidence(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.evidence.insert(key.into(), value);
        self
    }

    pub fn with_latency(mut self, latency_micros: u64) -> Self {
        self.latency_micros = latency_micros;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn l0_result_round_trips_through_json() {
        let r = L0Result::fail("L0-002", "over-broad permission grant")
            .with_evidence("matched", serde_json::json!(["contents: write"]))
            .with_latency(42);
        let json = serde_json::to_string(&r).unwrap();
        let back: L0Result = serde_json::from_str(&json).unwrap();
        assert_eq!(back, r);
    }
}
