//! Warden Calibration - the false-positive calibration store.
//!
//! Records rule outcomes, lets human reviewers mark them as false positives,
//! and computes windowed false-positive-rate statistics per rule. Ingestion
//! is gated twice, both fail-closed:
//!
//! - **Consent**: no event referencing an organization is persisted without
//!   a valid consent grant. Absence of consent is a hard rejection.
//! - **Authenticity**: a submission carrying a nonce-binding claim is only
//!   accepted when the trust protocol verifies it.
//!
//! Windowed statistics are always computed over the exact adapter result
//! set — no sampling, no caching across calls.

#![deny(unsafe_code)]

pub mod anonymize;
pub mod error;
pub mod store;
pub mod window;

pub use anonymize::{AnonymizedOrg, OrgAnonymizer};
pub use error::CalibrationError;
pub use store::{BindingClaim, CalibrationConfig, CalibrationStore};
pub use window::statistics;
