//! Verification verdict types.
//!
//! `VerificationResult` is what the verifier returns for a completed
//! inspection. Each flag maps to a distinct tampering scenario, so the
//! message always names which checks failed rather than collapsing them
//! into a single boolean.

use serde::{Deserialize, Serialize};

use crate::inspection::InspectionId;

/// The structured verdict produced by verifying one completed inspection.
///
/// Overall validity is the conjunction of the three flags:
///
/// - `content_valid = false`: the stored content fields were altered after
///   completion, or the stored hash itself was tampered with.
/// - `signature_valid = false`: the hash, the inspector attribution, or
///   the signing timestamp was altered, or the signature was forged
///   without the key.
/// - `chain_valid = false`: a predecessor in this asset's history was
///   inserted, deleted, or reordered since this inspection was completed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationResult {
    /// The inspection that was verified.
    pub inspection_id: InspectionId,
    /// The stored content hash matches a fresh recomputation.
    pub content_valid: bool,
    /// The stored signature matches a fresh recomputation.
    pub signature_valid: bool,
    /// The stored chain link matches the asset's current completed chain.
    pub chain_valid: bool,
    /// Human-readable summary naming exactly which checks failed.
    pub message: String,
}

impl VerificationResult {
    /// True only when every integrity check passed.
    pub fn is_valid(&self) -> bool {
        self.content_valid && self.signature_valid && self.chain_valid
    }
}
