//! Warden Trust - the nonce binding trust protocol.
//!
//! Binds one rotating random nonce to one verified organizational identity,
//! used to authenticate calibration submissions. State machine per org:
//!
//! ```text
//! unbound -> active -> (rotated -> active again, old becomes revoked)
//!                   \-> revoked (terminal until re-verification)
//! ```
//!
//! Invariants enforced here:
//!
//! - **One verified identity = one active nonce** (Sybil resistance). The
//!   existence check and the insert are a single atomic adapter operation.
//! - **Rotation has no grace window.** The old nonce is rejected the moment
//!   rotation completes; any overlapping-validity window is implemented one
//!   layer up by running two protocol instances against two secret
//!   versions, never by weakening this invariant.
//! - **History is append-only** and never pruned by this protocol.

#![deny(unsafe_code)]

pub mod error;
pub mod protocol;

pub use error::TrustError;
pub use protocol::{BindingStatus, NonceBindingProtocol};
