//! The storage seam of the FIREMARK core.
//!
//! The integrity subsystem never talks to a database directly. Everything
//! it needs from persistence is expressed by `InspectionStore`, and the
//! reference implementation lives in `firemark-store`. A SQL-backed
//! implementation plugs in here without touching the lifecycle or the
//! verifier.

use firemark_contracts::{
    error::FiremarkResult,
    inspection::{AssetId, Inspection, InspectionId},
};

/// CRUD plus the chain query the core needs from persistence.
///
/// Implementations are trusted to return what they were given. They do
/// NOT enforce lifecycle rules; the `Lifecycle` service is the only
/// mutation path that upholds post-completion immutability, and the
/// verifier exists precisely to detect writes that bypassed it.
pub trait InspectionStore: Send + Sync {
    /// Persist a newly created inspection.
    ///
    /// Fails with `Store` if the id already exists.
    fn insert(&self, inspection: Inspection) -> FiremarkResult<()>;

    /// Fetch an inspection by id. `Ok(None)` when unknown.
    fn get(&self, id: &InspectionId) -> FiremarkResult<Option<Inspection>>;

    /// Replace an existing inspection wholesale.
    ///
    /// Fails with `Store` if the id does not exist. Last write wins; the
    /// mutable phase needs no finer coordination because no hash protects
    /// it yet.
    fn put(&self, inspection: Inspection) -> FiremarkResult<()>;

    /// All `Completed` inspections for an asset, ordered by `signed_at`
    /// ascending.
    ///
    /// This ordering defines the hash chain: "previous" means previous by
    /// completion time, never by creation time.
    fn completed_for_asset(&self, asset_id: &AssetId) -> FiremarkResult<Vec<Inspection>>;
}
