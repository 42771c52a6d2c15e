//! Warden Store - persistence adapter contracts consumed by the core.
//!
//! The core keeps no cross-request mutable state of its own: all state lives
//! behind these contracts. Production backends are wired by out-of-scope
//! infrastructure code; the in-memory implementations here are explicit
//! test/local variants behind the same contracts, never silent runtime
//! fallbacks.
//!
//! Fail-closed rule: a timed-out or unreachable store surfaces as a
//! [`StoreError`], never as an empty or zero result.

#![deny(unsafe_code)]

pub mod error;
pub mod memory;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use memory::{
    MemoryBindingStore, MemoryConsentStore, MemoryEventStore, MemoryKvStore, MemorySecretStore,
};
pub use traits::{
    BindingStore, CalibrationEventStore, ConsentStore, KeyValueStore, SecretStore, SecretVersion,
};
