//! Warden Invariants - the L0 invariant validator.
//!
//! Five fixed, cheap, fail-closed safety checks. All five MUST pass before
//! any higher-layer rule analysis proceeds (hard gate). Each check is a pure
//! function of its inputs: no I/O, no retries, no shared state. Evidence
//! from failing checks is preserved verbatim in the final decision's
//! reasons.
//!
//! ## The five checks
//!
//! - **L0-001** Content digest integrity
//! - **L0-002** Least-privilege permission scan
//! - **L0-003** Drift magnitude
//! - **L0-004** Nonce freshness
//! - **L0-005** Contraction witness

#![deny(unsafe_code)]

pub mod checks;
pub mod input;
pub mod validator;

pub use checks::{
    ContentDigestCheck, ContractionWitnessCheck, DriftMagnitudeCheck, L0Check,
    LeastPrivilegeCheck, NonceFreshnessCheck, OVER_BROAD_PERMISSION_PATTERNS,
};
pub use input::{ContractionInput, DriftInput, L0Config, L0Input, ReviewWitness};
pub use validator::L0Validator;
