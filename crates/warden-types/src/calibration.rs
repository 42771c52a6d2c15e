use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::decision::Outcome;

/// One recorded rule outcome, subject to later human review.
///
/// Created on every rule outcome; mutated exactly once, when a reviewer
/// marks it as a false positive. Never deleted by the core — expiry is the
/// persistence adapter's TTL policy.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FpEvent {
    pub event_id: String,
    pub rule_id: String,
    pub rule_version: String,
    pub finding_id: String,
    pub outcome: Outcome,
    #[serde(default)]
    pub is_false_positive: bool,
    #[serde(default)]
    pub reviewed_by: Option<String>,
    #[serde(default)]
    pub reviewed_at: Option<DateTime<Utc>>,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub context: HashMap<String, serde_json::Value>,
}

impl FpEvent {
    /// Create an unreviewed event with a fresh id.
    pub fn new(
        rule_id: impl Into<String>,
        rule_version: impl Into<String>,
        finding_id: impl Into<String>,
        outcome: Outcome,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            event_id: uuid::Uuid::new_v4().to_string(),
            rule_id: rule_id.into(),
            rule_version: rule_version.into(),
            finding_id: finding_id.into(),
            outcome,
            is_false_positive: false,
            reviewed_by: None,
            reviewed_at: None,
            timestamp,
            context: HashMap::new(),
        }
    }

    /// Primary key at the adapter: duplicate `(rule_id, timestamp, event_id)`
    /// appends are rejected.
    pub fn storage_key(&self) -> String {
        format!(
            "{}:{}:{}",
            self.rule_id,
            self.timestamp.to_rfc3339(),
            self.event_id
        )
    }

    /// An event counts as reviewed once a non-empty reviewer is stamped.
    pub fn is_reviewed(&self) -> bool {
        self.reviewed_by
            .as_deref()
            .map(|r| !r.is_empty())
            .unwrap_or(false)
    }
}

/// Windowed false-positive statistics for one rule.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FpStatistics {
    pub total: usize,
    pub false_positives: usize,
    pub true_positives: usize,
    pub pending: usize,
    /// `false_positives / (total - pending)`, `0.0` when nothing is reviewed.
    pub observed_fpr: f64,
}

/// Derived view over a window of events. Recomputed on every query;
/// never cached across calls.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FpWindow {
    pub rule_id: String,
    pub rule_version: String,
    pub window_size: usize,
    pub statistics: FpStatistics,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_event_is_pending() {
        let e = FpEvent::new("WD-001", "1.0.0", "finding-1", Outcome::Block, Utc::now());
        assert!(!e.is_reviewed());
        assert!(!e.is_false_positive);
    }

    #[test]
    fn empty_reviewer_does_not_count_as_reviewed() {
        let mut e = FpEvent::new("WD-001", "1.0.0", "finding-1", Outcome::Block, Utc::now());
        e.reviewed_by = Some(String::new());
        assert!(!e.is_reviewed());
        e.reviewed_by = Some("alice".into());
        assert!(e.is_reviewed());
    }

    #[test]
    fn storage_key_composes_rule_timestamp_and_id() {
        let e = FpEvent::new("WD-001", "1.0.0", "finding-1", Outcome::Warn, Utc::now());
        let key = e.storage_key();
        assert!(key.starts_with("WD-001:"));
        assert!(key.ends_with(&e.event_id));
    }

    #[test]
    fn fp_event_round_trips_through_json() {
        let mut e = FpEvent::new("WD-001", "1.0.0", "finding-1", Outcome::Block, Utc::now());
        e.is_false_positive = true;
        e.reviewed_by = Some("alice".into());
        e.reviewed_at = Some(Utc::now());
        let json = serde_json::to_string(&e).unwrap();
        let back: FpEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, e);
    }
}
