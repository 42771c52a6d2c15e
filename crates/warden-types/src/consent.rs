use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Per-organization, per-resource data-collection grant with optional expiry.
///
/// Read-only from the core's perspective; consulted before any calibration
/// data referencing the organization is persisted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConsentRecord {
    pub org_id: String,
    pub resource: String,
    pub scope: String,
    pub granted_at: DateTime<Utc>,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

impl ConsentRecord {
    /// Is this grant valid at the given instant?
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.map(|e| now < e).unwrap_or(true)
    }
}
