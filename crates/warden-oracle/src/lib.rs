//! Warden Oracle - the rule evaluation and decision engine.
//!
//! One evaluation call is a staged pipeline:
//!
//! 1. the L0 invariant gate (any failure blocks, no rule runs);
//! 2. rule evaluation, where an errored rule contributes a synthetic
//!    critical violation instead of silently contributing nothing;
//! 3. calibration suppression of real, non-critical findings;
//! 4. circuit-breaker accounting per `(rule, org)` pair;
//! 5. the fold into a single allow / warn / block decision, with
//!    degraded-mode downgrade when every blocking rule has tripped.

#![deny(unsafe_code)]

pub mod error;
pub mod mocks;
pub mod oracle;
pub mod rule;

pub use error::OracleError;
pub use oracle::{Oracle, OracleConfig, OracleInput};
pub use rule::{PolicyRule, RuleContext, RuleError};
