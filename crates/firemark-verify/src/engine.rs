//! The read-only verification engine.
//!
//! `VerifyEngine` recomputes everything completion fixed in place and
//! reports a structured verdict. It runs all three checks before
//! returning so an auditor sees the full picture in one pass; each flag
//! implies a different tampering scenario and the message names exactly
//! which checks failed.
//!
//! Verification is side-effect free and takes no locks. Store failures
//! surface as `Store` errors, never as a false verdict: a repository
//! outage is a transient fault, not a finding.

use std::sync::Arc;

use tracing::{debug, warn};

use firemark_contracts::{
    error::{FiremarkError, FiremarkResult},
    inspection::{Inspection, InspectionId, InspectionStatus},
    verify::VerificationResult,
};
use firemark_core::{chain::ChainLinker, traits::InspectionStore};
use firemark_integrity::{verify_hash, InspectorSigner};

/// Re-derives and checks content hash, signature, and chain link for a
/// completed inspection.
pub struct VerifyEngine {
    store: Arc<dyn InspectionStore>,
    linker: ChainLinker,
    signer: InspectorSigner,
}

impl VerifyEngine {
    /// Create an engine over the given store, using the process signer.
    ///
    /// The signer must hold the same key completion used; a rotated key
    /// makes every older signature report invalid, which is correct from
    /// the verifier's point of view.
    pub fn new(store: Arc<dyn InspectionStore>, signer: InspectorSigner) -> Self {
        let linker = ChainLinker::new(Arc::clone(&store));
        Self {
            store,
            linker,
            signer,
        }
    }

    /// Verify one completed inspection.
    ///
    /// # Errors
    ///
    /// `NotFound` for unknown ids; `InvalidState` when the inspection is
    /// still `InProgress` or was soft-deleted before completion (there is
    /// nothing attested to verify); `Store` for repository failures. A
    /// failed integrity check is NOT an error: it comes back as `false`
    /// flags in the result.
    pub fn verify(&self, id: &InspectionId) -> FiremarkResult<VerificationResult> {
        let inspection = self
            .store
            .get(id)?
            .ok_or(FiremarkError::NotFound { inspection_id: *id })?;

        match inspection.status {
            InspectionStatus::Completed => {}
            InspectionStatus::InProgress | InspectionStatus::Deleted => {
                return Err(FiremarkError::InvalidState {
                    operation: "verify".to_string(),
                    status: inspection.status,
                });
            }
        }

        let content_valid = self.check_content(&inspection)?;
        let signature_valid = self.check_signature(&inspection);
        let chain_valid = self.linker.validate_link(&inspection)?;

        let message = Self::build_message(content_valid, signature_valid, chain_valid);
        if !(content_valid && signature_valid && chain_valid) {
            warn!(
                inspection_id = %id,
                content_valid,
                signature_valid,
                chain_valid,
                "integrity verification failed"
            );
        } else {
            debug!(inspection_id = %id, "integrity verification passed");
        }

        Ok(VerificationResult {
            inspection_id: *id,
            content_valid,
            signature_valid,
            chain_valid,
            message,
        })
    }

    // ── Individual checks ─────────────────────────────────────────────────────

    /// Stored content still hashes to the stored content hash.
    fn check_content(&self, inspection: &Inspection) -> FiremarkResult<bool> {
        let stored_hash = match inspection.content_hash.as_deref() {
            Some(hash) => hash,
            // A completed record without a hash is tampering by definition.
            None => return Ok(false),
        };

        match verify_hash(&inspection.content, stored_hash) {
            Ok(matches) => Ok(matches),
            // Content that no longer canonicalizes (e.g. a checklist answer
            // was deleted from the row) was altered after completion.
            Err(FiremarkError::Serialization { .. }) => Ok(false),
            Err(other) => Err(other),
        }
    }

    /// Stored signature still binds inspector, hash, and signing instant.
    fn check_signature(&self, inspection: &Inspection) -> bool {
        let (signature, content_hash, signed_at) = match (
            inspection.inspector_signature.as_deref(),
            inspection.content_hash.as_deref(),
            inspection.signed_at.as_ref(),
        ) {
            (Some(signature), Some(hash), Some(at)) => (signature, hash, at),
            // Any missing attestation field on a completed record fails.
            _ => return false,
        };

        self.signer.verify(
            signature,
            &inspection.content.inspector_id,
            content_hash,
            signed_at,
        )
    }

    fn build_message(content_valid: bool, signature_valid: bool, chain_valid: bool) -> String {
        if content_valid && signature_valid && chain_valid {
            return "all integrity checks passed".to_string();
        }

        let mut failed = Vec::new();
        if !content_valid {
            failed.push("content hash mismatch (fields altered after completion or hash tampered)");
        }
        if !signature_valid {
            failed.push("signature invalid (attribution, timestamp, or hash altered, or forged)");
        }
        if !chain_valid {
            failed.push("chain link broken (asset history inserted, deleted, or reordered)");
        }
        failed.join("; ")
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use firemark_contracts::content::{ChecklistItem, ChecklistResponse, InspectionType};
    use firemark_contracts::inspection::{AssetId, InspectionResult, InspectorId};
    use firemark_core::traits::InspectionStore;
    use firemark_core::Lifecycle;
    use firemark_integrity::SigningKey;
    use firemark_store::InMemoryInspectionStore;

    use super::*;

    /// A real lifecycle over a real in-memory store, plus a verifier
    /// sharing both, so tests can tamper through the store and watch the
    /// verifier catch it.
    struct Fixture {
        store: Arc<InMemoryInspectionStore>,
        lifecycle: Lifecycle,
        engine: VerifyEngine,
    }

    fn fixture() -> Fixture {
        let store = Arc::new(InMemoryInspectionStore::new());
        let signer =
            InspectorSigner::new(SigningKey::from_bytes(b"verify-test-key".to_vec()).unwrap());
        let lifecycle = Lifecycle::new(store.clone(), signer.clone());
        let engine = VerifyEngine::new(store.clone(), signer);
        Fixture {
            store,
            lifecycle,
            engine,
        }
    }

    fn all_pass() -> Vec<ChecklistResponse> {
        ChecklistItem::ALL
            .iter()
            .map(|item| ChecklistResponse {
                item: *item,
                passed: true,
            })
            .collect()
    }

    /// Create, answer, and complete one inspection for `asset`.
    fn completed_inspection(fx: &Fixture, asset: &str) -> InspectionId {
        let id = fx
            .lifecycle
            .create(
                AssetId::new(asset),
                InspectorId::new("insp-jgarcia"),
                InspectionType::Monthly,
            )
            .unwrap();
        fx.lifecycle.record_checklist_responses(&id, &all_pass()).unwrap();
        fx.lifecycle.complete(&id, InspectionResult::Pass, None).unwrap();
        id
    }

    // ── Happy path and preconditions ─────────────────────────────────────────

    #[test]
    fn untampered_inspection_verifies_clean() {
        let fx = fixture();
        let id = completed_inspection(&fx, "EXT-1");

        let result = fx.engine.verify(&id).unwrap();
        assert!(result.is_valid(), "untouched record must verify: {}", result.message);
        assert_eq!(result.message, "all integrity checks passed");
    }

    #[test]
    fn verify_unknown_id_is_not_found() {
        let fx = fixture();
        match fx.engine.verify(&InspectionId::new()) {
            Err(FiremarkError::NotFound { .. }) => {}
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[test]
    fn verify_in_progress_is_invalid_state() {
        let fx = fixture();
        let id = fx
            .lifecycle
            .create(
                AssetId::new("EXT-1"),
                InspectorId::new("insp-jgarcia"),
                InspectionType::Monthly,
            )
            .unwrap();

        match fx.engine.verify(&id) {
            Err(FiremarkError::InvalidState { status, .. }) => {
                assert_eq!(status, InspectionStatus::InProgress);
            }
            other => panic!("expected InvalidState, got {other:?}"),
        }
    }

    #[test]
    fn verify_deleted_is_invalid_state() {
        let fx = fixture();
        let id = fx
            .lifecycle
            .create(
                AssetId::new("EXT-1"),
                InspectorId::new("insp-jgarcia"),
                InspectionType::Monthly,
            )
            .unwrap();
        fx.lifecycle.delete(&id).unwrap();

        assert!(matches!(
            fx.engine.verify(&id),
            Err(FiremarkError::InvalidState { .. })
        ));
    }

    // ── Tamper scenarios ─────────────────────────────────────────────────────

    #[test]
    fn mutated_content_field_fails_content_check_only() {
        let fx = fixture();
        let id = completed_inspection(&fx, "EXT-1");

        // Out-of-band edit: flip a checklist answer through the store,
        // bypassing the lifecycle entirely.
        let mut row = fx.store.get(&id).unwrap().unwrap();
        row.content.checklist.insert(ChecklistItem::SealIntact, false);
        fx.store.put(row).unwrap();

        let result = fx.engine.verify(&id).unwrap();
        assert!(!result.content_valid);
        // The signature covers the hash, not the raw content, so it still
        // verifies; the chain link is untouched.
        assert!(result.signature_valid);
        assert!(result.chain_valid);
        assert!(result.message.contains("content hash mismatch"));
    }

    #[test]
    fn mutated_stored_hash_fails_content_and_signature() {
        let fx = fixture();
        let id = completed_inspection(&fx, "EXT-1");

        let mut row = fx.store.get(&id).unwrap().unwrap();
        row.content_hash = Some("0".repeat(64));
        fx.store.put(row).unwrap();

        let result = fx.engine.verify(&id).unwrap();
        // Content no longer matches the stored hash, and the signature was
        // produced over the original hash.
        assert!(!result.content_valid);
        assert!(!result.signature_valid);
        assert!(result.message.contains("content hash mismatch"));
        assert!(result.message.contains("signature invalid"));
    }

    #[test]
    fn forged_signature_fails_signature_check_only() {
        let fx = fixture();
        let id = completed_inspection(&fx, "EXT-1");

        let mut row = fx.store.get(&id).unwrap().unwrap();
        row.inspector_signature = Some("ab".repeat(32));
        fx.store.put(row).unwrap();

        let result = fx.engine.verify(&id).unwrap();
        assert!(result.content_valid);
        assert!(!result.signature_valid);
        assert!(result.chain_valid);
    }

    #[test]
    fn reattributed_inspector_fails_signature_check() {
        let fx = fixture();
        let id = completed_inspection(&fx, "EXT-1");

        // Change who gets the credit; the signature binds the original.
        let mut row = fx.store.get(&id).unwrap().unwrap();
        row.content.inspector_id = InspectorId::new("insp-impostor");
        fx.store.put(row).unwrap();

        let result = fx.engine.verify(&id).unwrap();
        // The inspector id is attested content too, so the hash breaks first.
        assert!(!result.content_valid);
        assert!(!result.signature_valid);
    }

    #[test]
    fn deleted_predecessor_breaks_only_the_successor_chain() {
        let fx = fixture();
        let first = completed_inspection(&fx, "EXT-1");
        let second = completed_inspection(&fx, "EXT-1");

        // Hard-delete the predecessor out from under the chain.
        fx.store.remove(&first).unwrap();

        let result = fx.engine.verify(&second).unwrap();
        assert!(result.content_valid, "successor's own content is untouched");
        assert!(result.signature_valid, "successor's signature is untouched");
        assert!(!result.chain_valid, "the missing predecessor must be detected");
        assert!(result.message.contains("chain link broken"));
    }

    #[test]
    fn inserted_predecessor_breaks_the_successor_chain() {
        let fx = fixture();
        let first = completed_inspection(&fx, "EXT-1");
        let second = completed_inspection(&fx, "EXT-1");

        // Forge a completed record wedged between first and second by
        // back-dating its signed_at.
        let mut forged = fx.store.get(&first).unwrap().unwrap();
        forged.id = InspectionId::new();
        forged.content_hash = Some("f".repeat(64));
        forged.signed_at = forged.signed_at.map(|at| at + chrono::Duration::nanoseconds(1));
        fx.store.insert(forged).unwrap();

        let result = fx.engine.verify(&second).unwrap();
        assert!(!result.chain_valid, "an inserted record must break the successor");
    }

    #[test]
    fn independent_assets_do_not_cross_contaminate() {
        let fx = fixture();
        let tampered = completed_inspection(&fx, "EXT-1");
        let clean = completed_inspection(&fx, "EXT-2");

        fx.store.remove(&tampered).unwrap();

        let result = fx.engine.verify(&clean).unwrap();
        assert!(result.is_valid(), "EXT-2's chain does not involve EXT-1");
    }
}
