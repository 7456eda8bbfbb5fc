//! HMAC-SHA256 inspector attestation.
//!
//! The signature binds together a specific inspector, a specific content
//! hash, and a specific instant. Altering any one of the three invalidates
//! it. The signing key is process-wide immutable configuration, loaded
//! once at startup; a process that cannot load the key must refuse to
//! start rather than produce unattested records.
//!
//! Signed payload layout: `inspector_id | content_hash | rfc3339_millis`,
//! joined with `|`. The hash is fixed-width hex and the timestamp contains
//! no pipes, so the layout is unambiguous.

use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use tracing::debug;

use firemark_contracts::{
    error::{FiremarkError, FiremarkResult},
    inspection::InspectorId,
};

use crate::canonical::canonical_timestamp;

type HmacSha256 = Hmac<Sha256>;

/// The process-wide HMAC signing key.
///
/// Wraps raw secret bytes. Construction fails rather than accepting empty
/// material, so an `InspectorSigner` can only exist with a usable key.
#[derive(Clone)]
pub struct SigningKey {
    material: Vec<u8>,
}

impl SigningKey {
    /// Build a key from raw secret bytes.
    ///
    /// # Errors
    ///
    /// `SigningUnavailable` when the material is empty.
    pub fn from_bytes(material: impl Into<Vec<u8>>) -> FiremarkResult<Self> {
        let material = material.into();
        if material.is_empty() {
            return Err(FiremarkError::SigningUnavailable {
                reason: "signing key material is empty".to_string(),
            });
        }
        Ok(Self { material })
    }

    /// Load the key from an environment variable at process start.
    ///
    /// # Errors
    ///
    /// `SigningUnavailable` when the variable is unset or blank. Callers
    /// must treat this as fatal and exit.
    pub fn from_env(var: &str) -> FiremarkResult<Self> {
        match std::env::var(var) {
            Ok(value) if !value.trim().is_empty() => Self::from_bytes(value.into_bytes()),
            _ => Err(FiremarkError::SigningUnavailable {
                reason: format!("{var} is not set"),
            }),
        }
    }
}

impl std::fmt::Debug for SigningKey {
    // Never print key material, not even in debug output.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningKey")
            .field("material_len", &self.material.len())
            .finish()
    }
}

/// Produces and verifies inspector attestations.
///
/// One instance per process, constructed at startup with the loaded key
/// and shared by reference. Signing is CPU-bound and pure; no locking.
#[derive(Debug, Clone)]
pub struct InspectorSigner {
    key: SigningKey,
}

impl InspectorSigner {
    /// Create a signer around the process signing key.
    pub fn new(key: SigningKey) -> Self {
        Self { key }
    }

    fn mac(&self) -> HmacSha256 {
        // HMAC accepts any key length; new_from_slice only rejects at the
        // type level for fixed-size variants, never for Hmac<Sha256>.
        HmacSha256::new_from_slice(&self.key.material)
            .expect("HMAC-SHA256 accepts keys of any length")
    }

    /// Sign `(inspector, content_hash, at)` and return the hex signature.
    pub fn sign(
        &self,
        inspector_id: &InspectorId,
        content_hash: &str,
        at: &DateTime<Utc>,
    ) -> String {
        let mut mac = self.mac();
        mac.update(inspector_id.0.as_bytes());
        mac.update(b"|");
        mac.update(content_hash.as_bytes());
        mac.update(b"|");
        mac.update(canonical_timestamp(at).as_bytes());

        let signature = hex::encode(mac.finalize().into_bytes());
        debug!(
            inspector_id = %inspector_id.0,
            content_hash = %content_hash,
            "inspector attestation produced"
        );
        signature
    }

    /// Check a stored signature against a fresh recomputation.
    ///
    /// Never fails for malformed input: a signature that is not valid hex,
    /// has the wrong length, or was produced under a different key simply
    /// returns `false`.
    pub fn verify(
        &self,
        signature: &str,
        inspector_id: &InspectorId,
        content_hash: &str,
        at: &DateTime<Utc>,
    ) -> bool {
        let expected = match hex::decode(signature) {
            Ok(bytes) => bytes,
            Err(_) => return false,
        };

        let mut mac = self.mac();
        mac.update(inspector_id.0.as_bytes());
        mac.update(b"|");
        mac.update(content_hash.as_bytes());
        mac.update(b"|");
        mac.update(canonical_timestamp(at).as_bytes());

        // verify_slice is the constant-time comparison from the hmac crate.
        mac.verify_slice(&expected).is_ok()
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
