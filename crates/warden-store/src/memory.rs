//! In-memory reference implementations for the Warden adapter contracts.
//!
//! Deterministic and test-friendly. Production deployments wire real
//! backends (a hosted key-value store, a managed secret store, an event
//! database) behind the same contracts.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::RwLock;

use crate::traits::{
    BindingStore, CalibrationEventStore, ConsentStore, KeyValueStore, SecretStore, SecretVersion,
};
use crate::{StoreError, StoreResult};
use warden_types::{ConsentRecord, FpEvent, NonceBinding};

fn poisoned(what: &str) -> StoreError {
    StoreError::Backend(format!("{} lock poisoned", what))
}

// =========================================================================
// KEY-VALUE
// =========================================================================

struct KvEntry {
    value: serde_json::Value,
    expires_at: Option<DateTime<Utc>>,
}

impl KvEntry {
    fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.map(|e| now >= e).unwrap_or(false)
    }
}

/// In-memory key-value store with TTL, conditional writes and atomic adds.
#[derive(Default)]
pub struct MemoryKvStore {
    entries: RwLock<HashMap<String, KvEntry>>,
}

impl MemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryKvStore {
    async fn get(&self, key: &str) -> StoreResult<Option<serde_json::Value>> {
        let entries = self.entries.read().map_err(|_| poisoned("kv"))?;
        Ok(entries
            .get(key)
            .filter(|e| !e.is_expired(Utc::now()))
            .map(|e| e.value.clone()))
    }

    async fn put(
        &self,
        key: &str,
        value: serde_json::Value,
        ttl: Option<Duration>,
    ) -> StoreResult<()> {
        let mut entries = self.entries.write().map_err(|_| poisoned("kv"))?;
        entries.insert(
            key.to_string(),
            KvEntry {
                value,
                expires_at: ttl.map(|d| Utc::now() + d),
            },
        );
        Ok(())
    }

    async fn put_if_absent(
        &self,
        key: &str,
        value: serde_json::Value,
        ttl: Option<Duration>,
    ) -> StoreResult<()> {
        let mut entries = self.entries.write().map_err(|_| poisoned("kv"))?;
        let now = Utc::now();
        if entries.get(key).map(|e| !e.is_expired(now)).unwrap_or(false) {
            return Err(StoreError::Conflict(format!("key {} already exists", key)));
        }
        entries.insert(
            key.to_string(),
            KvEntry {
                value,
                expires_at: ttl.map(|d| now + d),
            },
        );
        Ok(())
    }

    async fn increment(&self, key: &str, ttl: Option<Duration>) -> StoreResult<u64> {
        // Single write lock for the whole read-add-write, so concurrent
        // increments through this adapter are linearizable.
        let mut entries = self.entries.write().map_err(|_| poisoned("kv"))?;
        let now = Utc::now();
        let current = match entries.get(key) {
            Some(e) if !e.is_expired(now) => e
                .value
                .as_u64()
                .ok_or_else(|| StoreError::Serialization(format!("key {} is not a counter", key)))?,
            _ => 0,
        };
        let next = current + 1;
        let expires_at = match entries.get(key) {
            Some(e) if !e.is_expired(now) => e.expires_at,
            _ => ttl.map(|d| now + d),
        };
        entries.insert(
            key.to_string(),
            KvEntry {
                value: serde_json::Value::from(next),
                expires_at,
            },
        );
        Ok(next)
    }
}

// =========================================================================
// SECRETS
// =========================================================================

/// In-memory secret store with versioned, concurrently enabled secrets.
#[derive(Default)]
pub struct MemorySecretStore {
    versions: RwLock<Vec<(SecretVersion, bool)>>,
}

impl MemorySecretStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Convenience constructor seeding one enabled version.
    pub fn with_material(material: Vec<u8>) -> Self {
        let store = Self::new();
        {
            let mut versions = store.versions.write().unwrap_or_else(|e| e.into_inner());
            versions.push((
                SecretVersion {
                    version_id: "v1".to_string(),
                    material,
                },
                true,
            ));
        }
        store
    }

    /// Disable a version (test hook for rotation scenarios).
    pub fn disable_version(&self, version_id: &str) -> StoreResult<()> {
        let mut versions = self.versions.write().map_err(|_| poisoned("secrets"))?;
        for (version, enabled) in versions.iter_mut() {
            if version.version_id == version_id {
                *enabled = false;
                return Ok(());
            }
        }
        Err(StoreError::NotFound(format!(
            "secret version {} not found",
            version_id
        )))
    }
}

#[async_trait]
impl SecretStore for MemorySecretStore {
    async fn current_version(&self) -> StoreResult<SecretVersion> {
        let versions = self.versions.read().map_err(|_| poisoned("secrets"))?;
        versions
            .iter()
            .rev()
            .find(|(_, enabled)| *enabled)
            .map(|(v, _)| v.clone())
            .ok_or_else(|| StoreError::NotFound("no enabled secret version".to_string()))
    }

    async fn enabled_versions(&self) -> StoreResult<Vec<SecretVersion>> {
        let versions = self.versions.read().map_err(|_| poisoned("secrets"))?;
        Ok(versions
            .iter()
            .rev()
            .filter(|(_, enabled)| *enabled)
            .map(|(v, _)| v.clone())
            .collect())
    }

    async fn create_version(&self, material: Vec<u8>) -> StoreResult<SecretVersion> {
        let mut versions = self.versions.write().map_err(|_| poisoned("secrets"))?;
        let version = SecretVersion {
            version_id: format!("v{}", versions.len() + 1),
            material,
        };
        versions.push((version.clone(), true));
        Ok(version)
    }
}

// =========================================================================
// CALIBRATION EVENTS
// =========================================================================

#[derive(Default)]
struct EventIndex {
    by_key: HashMap<String, FpEvent>,
    by_finding: HashMap<String, String>,
}

/// In-memory calibration event store with a secondary finding index.
#[derive(Default)]
pub struct MemoryEventStore {
    index: RwLock<EventIndex>,
}

impl MemoryEventStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CalibrationEventStore for MemoryEventStore {
    async fn append(&self, event: FpEvent) -> StoreResult<()> {
        let mut index = self.index.write().map_err(|_| poisoned("events"))?;
        let key = event.storage_key();
        if index.by_key.contains_key(&key) {
            return Err(StoreError::Conflict(format!(
                "event {} already recorded",
                key
            )));
        }
        index.by_finding.insert(event.finding_id.clone(), key.clone());
        index.by_key.insert(key, event);
        Ok(())
    }

    async fn find_by_finding(&self, finding_id: &str) -> StoreResult<Option<FpEvent>> {
        let index = self.index.read().map_err(|_| poisoned("events"))?;
        Ok(index
            .by_finding
            .get(finding_id)
            .and_then(|key| index.by_key.get(key))
            .cloned())
    }

    async fn update(&self, event: FpEvent) -> StoreResult<()> {
        let mut index = self.index.write().map_err(|_| poisoned("events"))?;
        let key = event.storage_key();
        if !index.by_key.contains_key(&key) {
            return Err(StoreError::NotFound(format!("event {} not found", key)));
        }
        index.by_key.insert(key, event);
        Ok(())
    }

    async fn query_recent(&self, rule_id: &str, limit: usize) -> StoreResult<Vec<FpEvent>> {
        let index = self.index.read().map_err(|_| poisoned("events"))?;
        let mut events: Vec<FpEvent> = index
            .by_key
            .values()
            .filter(|e| e.rule_id == rule_id)
            .cloned()
            .collect();
        events.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        events.truncate(limit);
        Ok(events)
    }

    async fn query_since(&self, rule_id: &str, since: DateTime<Utc>) -> StoreResult<Vec<FpEvent>> {
        let index = self.index.read().map_err(|_| poisoned("events"))?;
        let mut events: Vec<FpEvent> = index
            .by_key
            .values()
            .filter(|e| e.rule_id == rule_id && e.timestamp >= since)
            .cloned()
            .collect();
        events.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(events)
    }
}

// =========================================================================
// CONSENT
// =========================================================================

/// In-memory consent store.
#[derive(Default)]
pub struct MemoryConsentStore {
    grants: RwLock<Vec<ConsentRecord>>,
}

impl MemoryConsentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn grant(&self, record: ConsentRecord) -> StoreResult<()> {
        let mut grants = self.grants.write().map_err(|_| poisoned("consent"))?;
        grants.push(record);
        Ok(())
    }

    pub fn revoke(&self, org_id: &str, resource: &str, scope: &str) -> StoreResult<()> {
        let mut grants = self.grants.write().map_err(|_| poisoned("consent"))?;
        grants.retain(|g| !(g.org_id == org_id && g.resource == resource && g.scope == scope));
        Ok(())
    }
}

#[async_trait]
impl ConsentStore for MemoryConsentStore {
    async fn has_valid_consent(
        &self,
        org_id: &str,
        resource: &str,
        scope: &str,
    ) -> StoreResult<bool> {
        let grants = self.grants.read().map_err(|_| poisoned("consent"))?;
        let now = Utc::now();
        Ok(grants.iter().any(|g| {
            g.org_id == org_id && g.resource == resource && g.scope == scope && g.is_valid_at(now)
        }))
    }
}

// =========================================================================
// BINDINGS
// =========================================================================

/// In-memory binding store. History per org is an append-only vector; the
/// active binding is the last entry when not revoked.
#[derive(Default)]
pub struct MemoryBindingStore {
    bindings: RwLock<HashMap<String, Vec<NonceBinding>>>,
}

impl MemoryBindingStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn active_of(history: &[NonceBinding]) -> Option<&NonceBinding> {
    history.last().filter(|b| b.is_active())
}

#[async_trait]
impl BindingStore for MemoryBindingStore {
    async fn create_active(&self, binding: NonceBinding) -> StoreResult<()> {
        let mut bindings = self.bindings.write().map_err(|_| poisoned("bindings"))?;
        let history = bindings.entry(binding.org_id.clone()).or_default();
        if active_of(history).is_some() {
            return Err(StoreError::Conflict(format!(
                "active binding already exists for org {}",
                binding.org_id
            )));
        }
        history.push(binding);
        Ok(())
    }

    async fn get_active(&self, org_id: &str) -> StoreResult<Option<NonceBinding>> {
        let bindings = self.bindings.read().map_err(|_| poisoned("bindings"))?;
        Ok(bindings.get(org_id).and_then(|h| active_of(h)).cloned())
    }

    async fn revoke_active(
        &self,
        org_id: &str,
        reason: &str,
        at: DateTime<Utc>,
    ) -> StoreResult<NonceBinding> {
        let mut bindings = self.bindings.write().map_err(|_| poisoned("bindings"))?;
        let history = bindings
            .get_mut(org_id)
            .ok_or_else(|| StoreError::NotFound(format!("no bindings for org {}", org_id)))?;
        let current = history
            .last_mut()
            .filter(|b| b.is_active())
            .ok_or_else(|| StoreError::NotFound(format!("no active binding for org {}", org_id)))?;
        current.revoked = true;
        current.revoked_at = Some(at);
        current.revocation_reason = Some(reason.to_string());
        Ok(current.clone())
    }

    async fn rotate(
        &self,
        org_id: &str,
        new_binding: NonceBinding,
        reason: &str,
        at: DateTime<Utc>,
    ) -> StoreResult<NonceBinding> {
        // Revoke and insert under one lock: callers never observe a window
        // where both nonces verify.
        let mut bindings = self.bindings.write().map_err(|_| poisoned("bindings"))?;
        let history = bindings
            .get_mut(org_id)
            .ok_or_else(|| StoreError::NotFound(format!("no bindings for org {}", org_id)))?;
        let current = history
            .last_mut()
            .filter(|b| b.is_active())
            .ok_or_else(|| StoreError::NotFound(format!("no active binding for org {}", org_id)))?;
        current.revoked = true;
        current.revoked_at = Some(at);
        current.revocation_reason = Some(reason.to_string());
        history.push(new_binding.clone());
        Ok(new_binding)
    }

    async fn increment_usage(&self, org_id: &str) -> StoreResult<u64> {
        let mut bindings = self.bindings.write().map_err(|_| poisoned("bindings"))?;
        let history = bindings
            .get_mut(org_id)
            .ok_or_else(|| StoreError::NotFound(format!("no bindings for org {}", org_id)))?;
        let current = history
            .last_mut()
            .filter(|b| b.is_active())
            .ok_or_else(|| StoreError::NotFound(format!("no active binding for org {}", org_id)))?;
        current.usage_count += 1;
        Ok(current.usage_count)
    }

    async fn history(&self, org_id: &str) -> StoreResult<Vec<NonceBinding>> {
        let bindings = self.bindings.read().map_err(|_| poisoned("bindings"))?;
        Ok(bindings.get(org_id).cloned().unwrap_or_default())
    }
}
