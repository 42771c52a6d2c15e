use thiserror::Error;
use warden_store::StoreError;
use warden_trust::TrustError;

/// Errors from calibration ingestion and review.
#[derive(Error, Debug)]
pub enum CalibrationError {
    #[error("invalid event: {0}")]
    InvalidEvent(String),

    #[error("consent denied for org {org_id} on resource {resource}")]
    ConsentDenied { org_id: String, resource: String },

    #[error("nonce binding rejected: {0}")]
    BindingRejected(String),

    #[error("duplicate event: {0}")]
    DuplicateEvent(String),

    #[error("finding not found: {0}")]
    FindingNotFound(String),

    #[error("finding already reviewed: {0}")]
    AlreadyReviewed(String),

    #[error("trust protocol error: {0}")]
    Trust(#[from] TrustError),

    #[error("event store error: {0}")]
    Store(#[from] StoreError),
}
