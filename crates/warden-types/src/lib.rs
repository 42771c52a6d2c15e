//! Warden Types - shared data model for the governance decision engine.
//!
//! Every persisted entity here round-trips losslessly through JSON:
//! timestamps are RFC 3339 strings, binary nonce/signature/digest values
//! are lowercase hex strings, everything else is scalar/map/array shapes.

#![deny(unsafe_code)]

pub mod calibration;
pub mod consent;
pub mod decision;
pub mod l0;
pub mod trust;
pub mod violation;

pub use calibration::{FpEvent, FpStatistics, FpWindow};
pub use consent::ConsentRecord;
pub use decision::{Decision, EvaluationStats, Outcome};
pub use l0::L0Result;
pub use trust::NonceBinding;
pub use violation::{Severity, Violation};
