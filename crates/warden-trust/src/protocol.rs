use std::sync::Arc;

use chrono::{DateTime, Utc};
use ed25519_dalek::{Signature, Signer, SigningKey, Verifier};
use rand::rngs::OsRng;
use rand::RngCore;
use tracing::{info, warn};

use crate::error::TrustError;
use warden_store::{BindingStore, SecretStore, StoreError};
use warden_types::NonceBinding;

/// Outcome of [`NonceBindingProtocol::verify_binding`].
///
/// This is the single authoritative check used by both the L0 freshness
/// invariant and calibration ingestion.
#[derive(Clone, Debug)]
pub enum BindingStatus {
    Valid(NonceBinding),
    Invalid { reason: String },
}

impl BindingStatus {
    pub fn is_valid(&self) -> bool {
        matches!(self, BindingStatus::Valid(_))
    }

    fn invalid(reason: impl Into<String>) -> Self {
        BindingStatus::Invalid {
            reason: reason.into(),
        }
    }
}

/// The nonce binding trust protocol.
///
/// Holds the protocol signing key (loaded from the secret store at
/// construction) and a binding store adapter. Carries no other state, so
/// one instance is safe to share across concurrent callers.
pub struct NonceBindingProtocol {
    store: Arc<dyn BindingStore>,
    signing_key: SigningKey,
}

impl std::fmt::Debug for NonceBindingProtocol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NonceBindingProtocol").finish_non_exhaustive()
    }
}

impl NonceBindingProtocol {
    pub fn new(store: Arc<dyn BindingStore>, signing_key: SigningKey) -> Self {
        Self { store, signing_key }
    }

    /// Load the protocol signing key from the secret store's current
    /// version. Fail-closed: a missing or malformed secret is an error,
    /// never a generated fallback key.
    pub async fn from_secret_store(
        store: Arc<dyn BindingStore>,
        secrets: &dyn SecretStore,
    ) -> Result<Self, TrustError> {
        let version = secrets.current_version().await.map_err(|e| match e {
            StoreError::NotFound(msg) => TrustError::SigningKeyUnavailable(msg),
            other => TrustError::Store(other),
        })?;
        let key_bytes: [u8; 32] = version.material.as_slice().try_into().map_err(|_| {
            TrustError::InvalidKeyMaterial(format!(
                "secret version {} is not 32 bytes",
                version.version_id
            ))
        })?;
        Ok(Self::new(store, SigningKey::from_bytes(&key_bytes)))
    }

    /// Issue and store a new binding for an org with no active binding.
    ///
    /// Fails with [`TrustError::BindingExists`] when an active binding is
    /// present — one verified identity gets exactly one active nonce.
    pub async fn generate_and_bind(
        &self,
        org_id: &str,
        public_key: &str,
    ) -> Result<NonceBinding, TrustError> {
        let binding = self.build_binding(org_id, public_key, Utc::now());
        self.store
            .create_active(binding.clone())
            .await
            .map_err(|e| match e {
                StoreError::Conflict(_) => TrustError::BindingExists(org_id.to_string()),
                other => TrustError::Store(other),
            })?;
        info!(org_id, nonce = %binding.nonce, "nonce binding issued");
        Ok(binding)
    }

    /// Verify a `(nonce, org)` claim against the stored active binding.
    ///
    /// Invalid when no binding exists, the nonce does not match, the
    /// binding is revoked, or the stored signature does not verify under
    /// the protocol key. Store failures propagate as errors (fail closed),
    /// never as a negative verification.
    pub async fn verify_binding(
        &self,
        nonce: &str,
        org_id: &str,
    ) -> Result<BindingStatus, TrustError> {
        let Some(binding) = self.store.get_active(org_id).await? else {
            let history = self.store.history(org_id).await?;
            let status = if history.is_empty() {
                BindingStatus::invalid("no binding exists for org")
            } else {
                BindingStatus::invalid("binding revoked")
            };
            warn!(org_id, "binding verification failed: no active binding");
            return Ok(status);
        };

        if binding.nonce != nonce {
            warn!(org_id, "binding verification failed: nonce mismatch");
            return Ok(BindingStatus::invalid("nonce does not match active binding"));
        }

        if !self.signature_verifies(&binding) {
            warn!(org_id, "binding verification failed: bad signature");
            return Ok(BindingStatus::invalid("signature verification failed"));
        }

        Ok(BindingStatus::Valid(binding))
    }

    /// Rotate the active binding: revoke the current one and install a new
    /// one atomically from the caller's view. The old nonce is rejected
    /// immediately after this returns.
    pub async fn rotate_nonce(
        &self,
        org_id: &str,
        public_key: &str,
        reason: &str,
    ) -> Result<NonceBinding, TrustError> {
        let now = Utc::now();
        let new_binding = self.build_binding(org_id, public_key, now);
        let rotated = self
            .store
            .rotate(org_id, new_binding, reason, now)
            .await
            .map_err(|e| match e {
                StoreError::NotFound(_) => TrustError::NoActiveBinding(org_id.to_string()),
                other => TrustError::Store(other),
            })?;
        info!(org_id, reason, "nonce binding rotated");
        Ok(rotated)
    }

    /// Revoke the active binding without issuing a replacement (security
    /// incidents). The org must re-verify before a new binding is issued.
    pub async fn revoke_binding(
        &self,
        org_id: &str,
        reason: &str,
    ) -> Result<NonceBinding, TrustError> {
        let revoked = self
            .store
            .revoke_active(org_id, reason, Utc::now())
            .await
            .map_err(|e| match e {
                StoreError::NotFound(_) => TrustError::NoActiveBinding(org_id.to_string()),
                other => TrustError::Store(other),
            })?;
        warn!(org_id, reason, "nonce binding revoked");
        Ok(revoked)
    }

    /// Bump the active binding's usage counter (bookkeeping only).
    pub async fn increment_usage(&self, org_id: &str) -> Result<u64, TrustError> {
        self.store
            .increment_usage(org_id)
            .await
            .map_err(|e| match e {
                StoreError::NotFound(_) => TrustError::NoActiveBinding(org_id.to_string()),
                other => TrustError::Store(other),
            })
    }

    /// Full binding history for an org, oldest first. Append-only.
    pub async fn rotation_history(&self, org_id: &str) -> Result<Vec<NonceBinding>, TrustError> {
        Ok(self.store.history(org_id).await?)
    }

    fn build_binding(
        &self,
        org_id: &str,
        public_key: &str,
        issued_at: DateTime<Utc>,
    ) -> NonceBinding {
        let mut nonce_bytes = [0u8; 32];
        OsRng.fill_bytes(&mut nonce_bytes);
        let nonce = hex_encode(&nonce_bytes);

        let message = canonical_message(org_id, &nonce, public_key, issued_at);
        let signature = self.signing_key.sign(message.as_bytes());

        NonceBinding {
            org_id: org_id.to_string(),
            nonce,
            public_key: public_key.to_string(),
            signature: hex_encode(&signature.to_bytes()),
            issued_at,
            usage_count: 0,
            revoked: false,
            revoked_at: None,
            revocation_reason: None,
        }
    }

    fn signature_verifies(&self, binding: &NonceBinding) -> bool {
        let Ok(sig_bytes) = hex_decode(&binding.signature) else {
            return false;
        };
        let Ok(sig_array) = <[u8; 64]>::try_from(sig_bytes.as_slice()) else {
            return false;
        };
        let signature = Signature::from_bytes(&sig_array);
        let message = canonical_message(
            &binding.org_id,
            &binding.nonce,
            &binding.public_key,
            binding.issued_at,
        );
        self.signing_key
            .verifying_key()
            .verify(message.as_bytes(), &signature)
            .is_ok()
    }
}

/// Canonical signed payload: `(org_id, nonce, public_key, issued_at)`.
fn canonical_message(
    org_id: &str,
    nonce: &str,
    public_key: &str,
    issued_at: DateTime<Utc>,
) -> String {
    format!(
        "{}\n{}\n{}\n{}",
        org_id,
        nonce,
        public_key,
        issued_at.to_rfc3339()
    )
}

fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

fn hex_decode(hex: &str) -> Result<Vec<u8>, ()> {
    // Reject non-ASCII up front so the byte slicing below cannot split a
    // multi-byte character and panic on tampered store contents.
    if !hex.is_ascii() || hex.len() % 2 != 0 {
        return Err(());
    }
    (0..hex.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| ()))
        .collect()
}
