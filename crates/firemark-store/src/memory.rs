//! In-memory implementation of `InspectionStore`.
//!
//! `InMemoryInspectionStore` is the reference store: a `HashMap` behind a
//! `Mutex`, safe to share across threads while the lifecycle service and
//! the verifier read and write through it. Production deployments replace
//! this with a SQL-backed implementation of the same trait.
//!
//! The store enforces nothing. It returns what it was given, which is
//! exactly what the verifier needs: integrity tests tamper with rows
//! through `put` to simulate out-of-band modification, and the verifier
//! must catch it.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tracing::debug;

use firemark_contracts::{
    error::{FiremarkError, FiremarkResult},
    inspection::{AssetId, Inspection, InspectionId, InspectionStatus},
};
use firemark_core::traits::InspectionStore;

/// A thread-safe, map-backed inspection store.
#[derive(Default)]
pub struct InMemoryInspectionStore {
    rows: Arc<Mutex<HashMap<InspectionId, Inspection>>>,
}

impl InMemoryInspectionStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// The number of rows currently held, any status.
    pub fn len(&self) -> usize {
        self.lock_rows().map(|rows| rows.len()).unwrap_or(0)
    }

    /// True when the store holds no rows.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove a row outright, bypassing the lifecycle.
    ///
    /// This exists for tamper simulation in tests and tooling: hard-deleting
    /// a completed inspection is precisely the attack the chain check in the
    /// verifier is built to detect. It is not part of `InspectionStore`.
    pub fn remove(&self, id: &InspectionId) -> FiremarkResult<Option<Inspection>> {
        Ok(self.lock_rows()?.remove(id))
    }

    fn lock_rows(
        &self,
    ) -> FiremarkResult<std::sync::MutexGuard<'_, HashMap<InspectionId, Inspection>>> {
        self.rows.lock().map_err(|e| FiremarkError::Store {
            reason: format!("store lock poisoned: {e}"),
        })
    }
}

impl InspectionStore for InMemoryInspectionStore {
    fn insert(&self, inspection: Inspection) -> FiremarkResult<()> {
        let mut rows = self.lock_rows()?;
        if rows.contains_key(&inspection.id) {
            return Err(FiremarkError::Store {
                reason: format!("inspection {} already exists", inspection.id),
            });
        }
        debug!(inspection_id = %inspection.id, "row inserted");
        rows.insert(inspection.id, inspection);
        Ok(())
    }

    fn get(&self, id: &InspectionId) -> FiremarkResult<Option<Inspection>> {
        Ok(self.lock_rows()?.get(id).cloned())
    }

    fn put(&self, inspection: Inspection) -> FiremarkResult<()> {
        let mut rows = self.lock_rows()?;
        if !rows.contains_key(&inspection.id) {
            return Err(FiremarkError::Store {
                reason: format!("inspection {} does not exist", inspection.id),
            });
        }
        rows.insert(inspection.id, inspection);
        Ok(())
    }

    fn completed_for_asset(&self, asset_id: &AssetId) -> FiremarkResult<Vec<Inspection>> {
        let rows = self.lock_rows()?;
        let mut completed: Vec<Inspection> = rows
            .values()
            .filter(|row| {
                row.status == InspectionStatus::Completed && &row.content.asset_id == asset_id
            })
            .cloned()
            .collect();

        // Chain order: by the instant each hash became immutable.
        completed.sort_by_key(|row| row.signed_at);
        Ok(completed)
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
