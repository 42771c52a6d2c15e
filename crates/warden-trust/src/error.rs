use thiserror::Error;
use warden_store::StoreError;

/// Errors from the nonce binding protocol.
#[derive(Error, Debug)]
pub enum TrustError {
    #[error("active binding already exists for org: {0}")]
    BindingExists(String),

    #[error("no active binding for org: {0}")]
    NoActiveBinding(String),

    #[error("signing key unavailable: {0}")]
    SigningKeyUnavailable(String),

    #[error("invalid key material: {0}")]
    InvalidKeyMaterial(String),

    #[error("binding store error: {0}")]
    Store(#[from] StoreError),
}
