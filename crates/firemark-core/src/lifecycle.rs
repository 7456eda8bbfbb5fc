//! The inspection lifecycle state machine.
//!
//! `Lifecycle` is the only mutation path in the integrity core. It
//! enforces the state diagram:
//!
//!   InProgress ──complete──▶ Completed   (terminal, immutable)
//!   InProgress ──delete───▶  Deleted     (terminal, soft)
//!
//! and it is the one place where hashing, chain linking, and signing
//! happen, in this order at completion:
//!
//!   assemble content → prior_hash → content_hash → signature → persist
//!
//! Completion is serialized per asset through an advisory lock so two
//! inspections can never both observe the same prior hash and claim to
//! extend the chain from the same point. That is the only hard mutual
//! exclusion in the subsystem; the mutable phase is last-write-wins by
//! design.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::Utc;
use tracing::{debug, info, warn};

use firemark_contracts::{
    content::{ChecklistItem, ChecklistResponse, InspectionContent, InspectionType},
    error::{FiremarkError, FiremarkResult},
    inspection::{
        AssetId, CompletionReceipt, Inspection, InspectionId, InspectionPatch,
        InspectionResult, InspectionStatus, InspectorId,
    },
};
use firemark_integrity::{compute_hash, InspectorSigner};

use crate::{chain::ChainLinker, traits::InspectionStore};

/// The lifecycle service: creation, mutation, completion, soft deletion.
///
/// Construct one per process with the loaded signing key and share it;
/// all methods take `&self` and are safe to call concurrently.
pub struct Lifecycle {
    store: Arc<dyn InspectionStore>,
    linker: ChainLinker,
    signer: InspectorSigner,
    /// Per-asset advisory locks serializing chain extension.
    asset_locks: Mutex<HashMap<AssetId, Arc<Mutex<()>>>>,
}

impl Lifecycle {
    /// Create a lifecycle service over the given store and signer.
    pub fn new(store: Arc<dyn InspectionStore>, signer: InspectorSigner) -> Self {
        let linker = ChainLinker::new(Arc::clone(&store));
        Self {
            store,
            linker,
            signer,
            asset_locks: Mutex::new(HashMap::new()),
        }
    }

    /// Open a new inspection in `InProgress`.
    ///
    /// No hash or signature exists yet; the record is freely mutable
    /// until completion.
    pub fn create(
        &self,
        asset_id: AssetId,
        inspector_id: InspectorId,
        inspection_type: InspectionType,
    ) -> FiremarkResult<InspectionId> {
        let now = Utc::now();
        let content = InspectionContent::new(asset_id, inspector_id, inspection_type, now);
        let inspection = Inspection::new_in_progress(content, now);
        let id = inspection.id;

        info!(
            inspection_id = %id,
            asset_id = %inspection.content.asset_id.0,
            inspector_id = %inspection.content.inspector_id.0,
            inspection_type = inspection.content.inspection_type.as_str(),
            "inspection opened"
        );

        self.store.insert(inspection)?;
        Ok(id)
    }

    /// Apply a field patch to an in-progress inspection.
    ///
    /// # Errors
    ///
    /// `InvalidState` once the inspection is `Completed` or `Deleted`;
    /// `NotFound` for unknown ids.
    pub fn update(&self, id: &InspectionId, patch: InspectionPatch) -> FiremarkResult<()> {
        let mut inspection = self.fetch(id)?;
        Self::require_in_progress(&inspection, "update")?;

        let content = &mut inspection.content;
        if let Some(location) = patch.location {
            content.location = Some(location);
        }
        if let Some(inspection_type) = patch.inspection_type {
            content.inspection_type = inspection_type;
        }
        if let Some(psi) = patch.gauge_pressure_psi {
            content.gauge_pressure_psi = Some(psi);
        }
        if let Some(kg) = patch.weight_kg {
            content.weight_kg = Some(kg);
        }
        if let Some(description) = patch.damage_description {
            content.damage_description = Some(description);
        }
        if let Some(notes) = patch.notes {
            content.notes = Some(notes);
        }
        if let Some(flag) = patch.needs_service {
            content.needs_service = flag;
        }
        if let Some(reason) = patch.service_reason {
            content.service_reason = Some(reason);
        }
        if let Some(flag) = patch.needs_replacement {
            content.needs_replacement = flag;
        }
        if let Some(reason) = patch.replacement_reason {
            content.replacement_reason = Some(reason);
        }
        if let Some(photo_refs) = patch.photo_refs {
            content.photo_refs = photo_refs;
        }

        inspection.updated_at = Utc::now();
        self.store.put(inspection)
    }

    /// Upsert checklist answers, keyed by item.
    ///
    /// Re-answering an item overwrites the previous answer; the mutable
    /// phase carries no hash to protect.
    pub fn record_checklist_responses(
        &self,
        id: &InspectionId,
        responses: &[ChecklistResponse],
    ) -> FiremarkResult<()> {
        let mut inspection = self.fetch(id)?;
        Self::require_in_progress(&inspection, "record_checklist_responses")?;

        for response in responses {
            inspection
                .content
                .checklist
                .insert(response.item, response.passed);
        }

        debug!(
            inspection_id = %id,
            answered = inspection.content.checklist.len(),
            "checklist responses recorded"
        );

        inspection.updated_at = Utc::now();
        self.store.put(inspection)
    }

    /// Seal an inspection: hash, chain-link, sign, and flip to `Completed`.
    ///
    /// Runs under the asset's advisory lock so concurrent completions for
    /// the same asset observe distinct prior hashes. The declared result
    /// is advisory: any critical checklist item answered `false` forces
    /// the computed result to `Fail` regardless of it.
    ///
    /// # Errors
    ///
    /// `InvalidState` unless the inspection is `InProgress`;
    /// `Serialization` when a critical checklist item is unanswered;
    /// `NotFound` / `Store` from the underlying fetch and persist.
    pub fn complete(
        &self,
        id: &InspectionId,
        declared_result: InspectionResult,
        notes: Option<String>,
    ) -> FiremarkResult<CompletionReceipt> {
        // Cheap pre-check outside the lock for the common error paths.
        let preview = self.fetch(id)?;
        Self::require_in_progress(&preview, "complete")?;

        let asset_id = preview.content.asset_id.clone();
        let lock = self.asset_lock(&asset_id);
        let _guard = lock.lock().map_err(|e| FiremarkError::Store {
            reason: format!("asset completion lock poisoned: {e}"),
        })?;

        // Re-fetch under the lock; another completion may have raced us to
        // the pre-check.
        let mut inspection = self.fetch(id)?;
        Self::require_in_progress(&inspection, "complete")?;

        if let Some(notes) = notes {
            inspection.content.notes = Some(notes);
        }

        let previous_hash = self.linker.prior_hash(&asset_id)?;
        let content_hash = compute_hash(&inspection.content)?;
        let computed_result = Self::computed_result(&inspection.content, declared_result);

        let signed_at = Utc::now();
        let signature =
            self.signer
                .sign(&inspection.content.inspector_id, &content_hash, &signed_at);

        if computed_result != declared_result {
            warn!(
                inspection_id = %id,
                declared = declared_result.as_str(),
                computed = computed_result.as_str(),
                "declared result overridden by critical checklist failure"
            );
        }

        inspection.status = InspectionStatus::Completed;
        inspection.content_hash = Some(content_hash.clone());
        inspection.previous_hash = previous_hash.clone();
        inspection.inspector_signature = Some(signature.clone());
        inspection.signed_at = Some(signed_at);
        inspection.declared_result = Some(declared_result);
        inspection.computed_result = Some(computed_result);
        inspection.updated_at = signed_at;

        self.store.put(inspection)?;

        info!(
            inspection_id = %id,
            asset_id = %asset_id.0,
            content_hash = %content_hash,
            chained = previous_hash.is_some(),
            result = computed_result.as_str(),
            "inspection completed and sealed"
        );

        Ok(CompletionReceipt {
            inspection_id: *id,
            content_hash,
            previous_hash,
            signature,
            signed_at,
            computed_result,
        })
    }

    /// Soft-delete an in-progress inspection.
    ///
    /// Completed records are permanent audit artifacts; deleting one is
    /// `InvalidState`, always. The row survives with `status = Deleted`
    /// for audit even though it was never part of the hash chain.
    pub fn delete(&self, id: &InspectionId) -> FiremarkResult<()> {
        let mut inspection = self.fetch(id)?;
        Self::require_in_progress(&inspection, "delete")?;

        inspection.status = InspectionStatus::Deleted;
        inspection.updated_at = Utc::now();

        info!(inspection_id = %id, "inspection soft-deleted");
        self.store.put(inspection)
    }

    // ── Internal helpers ──────────────────────────────────────────────────────

    fn fetch(&self, id: &InspectionId) -> FiremarkResult<Inspection> {
        self.store
            .get(id)?
            .ok_or(FiremarkError::NotFound { inspection_id: *id })
    }

    /// Gate every mutation on an exhaustive status match.
    fn require_in_progress(inspection: &Inspection, operation: &str) -> FiremarkResult<()> {
        match inspection.status {
            InspectionStatus::InProgress => Ok(()),
            InspectionStatus::Completed | InspectionStatus::Deleted => {
                warn!(
                    inspection_id = %inspection.id,
                    operation,
                    status = inspection.status.as_str(),
                    "operation rejected by lifecycle state"
                );
                Err(FiremarkError::InvalidState {
                    operation: operation.to_string(),
                    status: inspection.status,
                })
            }
        }
    }

    /// The authoritative pass/fail rule.
    ///
    /// Any critical item answered `false` forces `Fail`. With all ten
    /// `true` the declared result stands; the rule downgrades, it never
    /// upgrades.
    fn computed_result(
        content: &InspectionContent,
        declared: InspectionResult,
    ) -> InspectionResult {
        let any_critical_failure = ChecklistItem::ALL
            .iter()
            .any(|item| content.checklist.get(item) == Some(&false));

        if any_critical_failure {
            InspectionResult::Fail
        } else {
            declared
        }
    }

    /// The advisory lock for one asset's chain extension.
    fn asset_lock(&self, asset_id: &AssetId) -> Arc<Mutex<()>> {
        let mut locks = self
            .asset_locks
            .lock()
            .expect("asset lock map poisoned");
        Arc::clone(locks.entry(asset_id.clone()).or_default())
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
