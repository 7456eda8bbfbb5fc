//! Per-asset hash-chain linking.
//!
//! Each completed inspection records the `content_hash` of the asset's
//! previously completed inspection. That single field is what turns a pile
//! of individually hashed records into a chain: deleting or reordering a
//! historical record changes what "previous" means for everything after
//! it, so the break is detectable even though every surviving record's own
//! hash still verifies.

use std::sync::Arc;

use tracing::debug;

use firemark_contracts::{
    error::FiremarkResult,
    inspection::{AssetId, Inspection},
};

use crate::traits::InspectionStore;

/// Resolves and validates chain links against the store.
///
/// Read-only. The serialization of concurrent chain extensions is the
/// lifecycle's job (per-asset advisory lock); the linker just answers
/// "what does the chain look like right now".
pub struct ChainLinker {
    store: Arc<dyn InspectionStore>,
}

impl ChainLinker {
    /// Create a linker over the given store.
    pub fn new(store: Arc<dyn InspectionStore>) -> Self {
        Self { store }
    }

    /// The `content_hash` of the asset's most recently completed
    /// inspection, or `None` when the asset has no completed history.
    ///
    /// "Most recent" is by `signed_at`, the instant the hash became
    /// immutable, never by creation time.
    pub fn prior_hash(&self, asset_id: &AssetId) -> FiremarkResult<Option<String>> {
        let completed = self.store.completed_for_asset(asset_id)?;
        let prior = completed
            .last()
            .and_then(|inspection| inspection.content_hash.clone());

        debug!(
            asset_id = %asset_id.0,
            chain_len = completed.len(),
            has_prior = prior.is_some(),
            "resolved prior hash for asset chain"
        );
        Ok(prior)
    }

    /// Check a completed inspection's stored `previous_hash` against the
    /// chain the store reports *now*.
    ///
    /// The expected predecessor is the completed inspection immediately
    /// before this one in the asset's `signed_at` order. A mismatch, or an
    /// inspection that no longer appears in its own asset's chain at all,
    /// returns `Ok(false)`: both mean the history was inserted into,
    /// deleted from, or reordered since this record was sealed.
    pub fn validate_link(&self, inspection: &Inspection) -> FiremarkResult<bool> {
        let chain = self.store.completed_for_asset(&inspection.content.asset_id)?;

        let position = match chain.iter().position(|entry| entry.id == inspection.id) {
            Some(position) => position,
            None => {
                debug!(
                    inspection_id = %inspection.id,
                    asset_id = %inspection.content.asset_id.0,
                    "inspection absent from its asset's completed chain"
                );
                return Ok(false);
            }
        };

        let expected_previous = if position == 0 {
            None
        } else {
            chain[position - 1].content_hash.clone()
        };

        Ok(inspection.previous_hash == expected_previous)
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
