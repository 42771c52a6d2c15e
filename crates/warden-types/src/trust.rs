use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One signed association between a verified organizational identity and a
/// rotating random nonce.
///
/// At most one active (non-revoked) binding may exist per `org_id` at any
/// time — the core Sybil-resistance invariant. `nonce`, `public_key` and
/// `signature` are lowercase hex strings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NonceBinding {
    pub org_id: String,
    pub nonce: String,
    pub public_key: String,
    pub signature: String,
    pub issued_at: DateTime<Utc>,
    #[serde(default)]
    pub usage_count: u64,
    #[serde(default)]
    pub revoked: bool,
    #[serde(default)]
    pub revoked_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub revocation_reason: Option<String>,
}

impl NonceBinding {
    pub fn is_active(&self) -> bool {
        !self.revoked
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binding_round_trips_through_json() {
        let b = NonceBinding {
            org_id: "org-a".into(),
            nonce: "ab".repeat(32),
            public_key: "cd".repeat(32),
            signature: "ef".repeat(64),
            issued_at: Utc::now(),
            usage_count: 3,
            revoked: true,
            revoked_at: Some(Utc::now()),
            revocation_reason: Some("rotation".into()),
        };
        let json = serde_json::to_string(&b).unwrap();
        let back: NonceBinding = serde_json::from_str(&json).unwrap();
        assert_eq!(back, b);
        assert!(!back.is_active());
    }
}
