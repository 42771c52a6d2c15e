use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::CalibrationError;
use warden_store::SecretStore;

/// Domain separator for deriving anonymization keys from salt material.
const ANONYMIZATION_CONTEXT: &str = "warden calibration org anonymization v1";

/// A keyed one-way hash of an organization identifier, tagged with the salt
/// version that produced it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnonymizedOrg {
    pub salt_version: String,
    pub digest: String,
}

/// Anonymizes organization identifiers for aggregate export.
///
/// The hash is deterministic for a fixed salt version (same org, same
/// digest) and changes when the salt rotates. During rotation, digests
/// produced under any still-enabled salt version remain verifiable.
pub struct OrgAnonymizer {
    secrets: Arc<dyn SecretStore>,
}

impl OrgAnonymizer {
    pub fn new(secrets: Arc<dyn SecretStore>) -> Self {
        Self { secrets }
    }

    /// Hash an org id under the current salt version.
    pub async fn anonymize(&self, org_id: &str) -> Result<AnonymizedOrg, CalibrationError> {
        let version = self.secrets.current_version().await?;
        Ok(AnonymizedOrg {
            digest: keyed_digest(&version.material, org_id),
            salt_version: version.version_id,
        })
    }

    /// Does this digest match the org under any currently enabled salt
    /// version? Old and new versions stay valid in parallel during rotation.
    pub async fn verify(
        &self,
        org_id: &str,
        anonymized: &AnonymizedOrg,
    ) -> Result<bool, CalibrationError> {
        let versions = self.secrets.enabled_versions().await?;
        Ok(versions.iter().any(|v| {
            v.version_id == anonymized.salt_version
                && keyed_digest(&v.material, org_id) == anonymized.digest
        }))
    }
}

fn keyed_digest(salt_material: &[u8], org_id: &str) -> String {
    let key = blake3::derive_key(ANONYMIZATION_CONTEXT, salt_material);
    blake3::keyed_hash(&key, org_id.as_bytes())
        .to_hex()
        .to_string()
}
