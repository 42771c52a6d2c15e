//! Warden Breaker - the circuit breaker block counter.
//!
//! Time is truncated to the start of the current hour; each
//! `(rule_id, org_id, hour_bucket)` triple maps to one counter entry with a
//! TTL that expires the bucket after the configured retention. Increments
//! are atomic adds at the key-value adapter, so concurrent evaluations are
//! all reflected in the final count.
//!
//! Store-level failures propagate as errors. A breaker query that cannot
//! reach the store never reports "not broken" — that would itself be a
//! safety violation.

#![deny(unsafe_code)]

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use thiserror::Error;
use tracing::{debug, warn};

use warden_store::{KeyValueStore, StoreError};

/// Errors from circuit breaker operations.
#[derive(Error, Debug)]
pub enum BreakerError {
    #[error("counter store error: {0}")]
    Store(#[from] StoreError),
}

/// Configuration for the block counter.
#[derive(Clone, Debug)]
pub struct BreakerConfig {
    /// How long expired buckets are retained (TTL). Default 24h.
    pub retention: Duration,
    /// Default per-hour trip threshold. Default 10.
    pub default_threshold: u64,
}

impl Default for BreakerConfig {
    fn default() -> Self {
        Self {
            retention: Duration::hours(24),
            default_threshold: 10,
        }
    }
}

/// Bounded, time-bucketed abuse counter.
pub struct BlockCounter {
    kv: Arc<dyn KeyValueStore>,
    config: BreakerConfig,
}

impl BlockCounter {
    pub fn new(kv: Arc<dyn KeyValueStore>, config: BreakerConfig) -> Self {
        Self { kv, config }
    }

    pub fn config(&self) -> &BreakerConfig {
        &self.config
    }

    /// Increment the current hour's bucket; returns the post-increment count.
    pub async fn increment(&self, rule_id: &str, org_id: &str) -> Result<u64, BreakerError> {
        self.increment_at(rule_id, org_id, Utc::now()).await
    }

    /// Increment the bucket containing `at` (deterministic test entry point).
    pub async fn increment_at(
        &self,
        rule_id: &str,
        org_id: &str,
        at: DateTime<Utc>,
    ) -> Result<u64, BreakerError> {
        let key = bucket_key(rule_id, org_id, at);
        let count = self.kv.increment(&key, Some(self.config.retention)).await?;
        debug!(rule_id, org_id, count, "block counter incremented");
        Ok(count)
    }

    /// Current count in the bucket containing `now`. A missing bucket reads
    /// as zero; a store failure does not.
    pub async fn count(&self, rule_id: &str, org_id: &str) -> Result<u64, BreakerError> {
        self.count_at(rule_id, org_id, Utc::now()).await
    }

    pub async fn count_at(
        &self,
        rule_id: &str,
        org_id: &str,
        at: DateTime<Utc>,
    ) -> Result<u64, BreakerError> {
        let key = bucket_key(rule_id, org_id, at);
        match self.kv.get(&key).await? {
            None => Ok(0),
            Some(value) => value.as_u64().ok_or_else(|| {
                BreakerError::Store(StoreError::Serialization(format!(
                    "bucket {} holds a non-counter value",
                    key
                )))
            }),
        }
    }

    /// Has the `(rule, org)` pair tripped the breaker this hour?
    pub async fn is_circuit_broken(
        &self,
        rule_id: &str,
        org_id: &str,
        threshold: u64,
    ) -> Result<bool, BreakerError> {
        self.is_circuit_broken_at(rule_id, org_id, threshold, Utc::now())
            .await
    }

    pub async fn is_circuit_broken_at(
        &self,
        rule_id: &str,
        org_id: &str,
        threshold: u64,
        at: DateTime<Utc>,
    ) -> Result<bool, BreakerError> {
        let count = self.count_at(rule_id, org_id, at).await?;
        let broken = count >= threshold;
        if broken {
            warn!(rule_id, org_id, count, threshold, "circuit breaker tripped");
        }
        Ok(broken)
    }
}

/// Counter key for the hour bucket containing `at`.
fn bucket_key(rule_id: &str, org_id: &str, at: DateTime<Utc>) -> String {
    let secs = at.timestamp();
    let hour_start = secs - secs.rem_euclid(3600);
    format!("breaker:{}:{}:{}", rule_id, org_id, hour_start)
}
