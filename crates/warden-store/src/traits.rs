use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::StoreResult;
use warden_types::{FpEvent, NonceBinding};

/// Key-value store with conditional-write, atomic-increment and TTL support.
///
/// `increment` must be an atomic add at the adapter, not read-modify-write
/// from the caller: the core may be invoked from multiple concurrent request
/// handlers and both increments must be reflected in the final count.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> StoreResult<Option<serde_json::Value>>;

    async fn put(
        &self,
        key: &str,
        value: serde_json::Value,
        ttl: Option<Duration>,
    ) -> StoreResult<()>;

    /// Conditional write: fails with [`crate::StoreError::Conflict`] if the
    /// key already exists.
    async fn put_if_absent(
        &self,
        key: &str,
        value: serde_json::Value,
        ttl: Option<Duration>,
    ) -> StoreResult<()>;

    /// Atomic add. Creates the counter at 1 (applying the TTL) on first
    /// touch and returns the post-increment count.
    async fn increment(&self, key: &str, ttl: Option<Duration>) -> StoreResult<u64>;
}

/// One version of a rotating secret.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretVersion {
    pub version_id: String,
    pub material: Vec<u8>,
}

/// Secret store supporting multiple concurrently valid versions.
///
/// During rotation, old and new versions stay enabled in parallel; callers
/// that need grace windows run against `enabled_versions`, never by
/// weakening single-version checks.
#[async_trait]
pub trait SecretStore: Send + Sync {
    /// The single latest enabled version.
    async fn current_version(&self) -> StoreResult<SecretVersion>;

    /// All currently enabled versions, newest first.
    async fn enabled_versions(&self) -> StoreResult<Vec<SecretVersion>>;

    /// Create and enable a new version; it becomes the current one.
    async fn create_version(&self, material: Vec<u8>) -> StoreResult<SecretVersion>;
}

/// Append-style store for calibration events with secondary lookup by
/// finding identifier.
#[async_trait]
pub trait CalibrationEventStore: Send + Sync {
    /// Append one event. Duplicate `(rule_id, timestamp, event_id)` keys are
    /// rejected with [`crate::StoreError::Conflict`] — recording is
    /// idempotent by construction.
    async fn append(&self, event: FpEvent) -> StoreResult<()>;

    /// Secondary lookup by finding identifier.
    async fn find_by_finding(&self, finding_id: &str) -> StoreResult<Option<FpEvent>>;

    /// Replace a stored event (the single permitted mutation: the
    /// false-positive review stamp). Fails if the event was never appended.
    async fn update(&self, event: FpEvent) -> StoreResult<()>;

    /// The `limit` most recent events for a rule, newest first.
    async fn query_recent(&self, rule_id: &str, limit: usize) -> StoreResult<Vec<FpEvent>>;

    /// All events for a rule at or after `since`, newest first.
    async fn query_since(&self, rule_id: &str, since: DateTime<Utc>) -> StoreResult<Vec<FpEvent>>;
}

/// Consent lookups gating calibration data collection per organization.
#[async_trait]
pub trait ConsentStore: Send + Sync {
    /// Does a non-expired grant exist for `(org_id, resource, scope)`?
    async fn has_valid_consent(
        &self,
        org_id: &str,
        resource: &str,
        scope: &str,
    ) -> StoreResult<bool>;
}

/// Identity-binding store backing the nonce binding trust protocol.
///
/// The at-most-one-active-binding invariant is enforced here, as a single
/// atomic operation — never as a check-then-insert pair with a race window.
#[async_trait]
pub trait BindingStore: Send + Sync {
    /// Conditional insert: fails with [`crate::StoreError::Conflict`] when an
    /// active (non-revoked) binding already exists for the org.
    async fn create_active(&self, binding: NonceBinding) -> StoreResult<()>;

    /// The active binding for an org, if any.
    async fn get_active(&self, org_id: &str) -> StoreResult<Option<NonceBinding>>;

    /// Mark the active binding revoked; returns the revoked binding.
    async fn revoke_active(
        &self,
        org_id: &str,
        reason: &str,
        at: DateTime<Utc>,
    ) -> StoreResult<NonceBinding>;

    /// Atomically revoke the current binding and install `new_binding`.
    /// Fails with [`crate::StoreError::NotFound`] when nothing is active.
    async fn rotate(
        &self,
        org_id: &str,
        new_binding: NonceBinding,
        reason: &str,
        at: DateTime<Utc>,
    ) -> StoreResult<NonceBinding>;

    /// Bump the active binding's usage counter; returns the new count.
    async fn increment_usage(&self, org_id: &str) -> StoreResult<u64>;

    /// Full binding history for an org, oldest first. Append-only; retention
    /// is a data-governance concern of the persistence layer, never pruned
    /// through this contract.
    async fn history(&self, org_id: &str) -> StoreResult<Vec<NonceBinding>>;
}
