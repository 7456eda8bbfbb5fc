//! The persisted inspection aggregate and its lifecycle vocabulary.
//!
//! `Inspection` wraps the hashable `InspectionContent` with identity,
//! explicit lifecycle status, and the integrity fields that are fixed at
//! completion time. Status is a tagged enum that every operation matches
//! exhaustively; it is never inferred from which fields happen to be null.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::content::{GeoPoint, InspectionContent, InspectionType};

/// Stable identifier of a physical asset (one fire extinguisher).
///
/// Opaque to this subsystem; typically the asset tag or barcode value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssetId(pub String);

impl AssetId {
    /// Construct from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

/// Stable identifier of the inspector of record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InspectorId(pub String);

impl InspectorId {
    /// Construct from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

/// Unique identifier for a single inspection record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InspectionId(pub uuid::Uuid);

impl InspectionId {
    /// Allocate a new, unique inspection ID.
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for InspectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for InspectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// The lifecycle state of an inspection record.
///
/// Transitions: `InProgress -> Completed` and `InProgress -> Deleted`.
/// Both targets are terminal. Completed records are permanent audit
/// artifacts and are never deleted, not even softly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InspectionStatus {
    /// Open for mutation by the inspector. No hash or signature exists.
    InProgress,
    /// Sealed: content hash, chain link, and signature are fixed forever.
    Completed,
    /// Soft-deleted before completion. Preserved for audit, never chained.
    Deleted,
}

impl InspectionStatus {
    /// Stable lowercase token for logs and error messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            InspectionStatus::InProgress => "in_progress",
            InspectionStatus::Completed => "completed",
            InspectionStatus::Deleted => "deleted",
        }
    }
}

/// The compliance outcome of a completed inspection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InspectionResult {
    /// Every critical check passed.
    Pass,
    /// Passed with advisories the inspector flagged for follow-up.
    ConditionalPass,
    /// At least one critical check failed, or the inspector failed it.
    Fail,
}

impl InspectionResult {
    /// Stable lowercase token for reports and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            InspectionResult::Pass => "pass",
            InspectionResult::ConditionalPass => "conditional_pass",
            InspectionResult::Fail => "fail",
        }
    }
}

/// The persisted inspection aggregate.
///
/// `content` holds everything the hash attests to. The integrity fields
/// (`content_hash`, `previous_hash`, `inspector_signature`, `signed_at`)
/// are `None` until completion and immutable afterwards. `previous_hash`
/// stays `None` on a completed record when it is the asset's first
/// completed inspection; the two cases are told apart by `status`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Inspection {
    /// System-generated identifier.
    pub id: InspectionId,
    /// The attested payload.
    pub content: InspectionContent,
    /// Explicit lifecycle state.
    pub status: InspectionStatus,
    /// SHA-256 (hex) of the canonical content. Set at completion.
    pub content_hash: Option<String>,
    /// `content_hash` of the asset's previously completed inspection.
    pub previous_hash: Option<String>,
    /// HMAC attestation binding inspector, hash, and signing instant.
    pub inspector_signature: Option<String>,
    /// The instant the signature was produced (UTC).
    pub signed_at: Option<DateTime<Utc>>,
    /// The result the inspector declared at completion. Advisory.
    pub declared_result: Option<InspectionResult>,
    /// The result computed from the critical checks. Authoritative.
    pub computed_result: Option<InspectionResult>,
    /// Audit column: record creation time.
    pub created_at: DateTime<Utc>,
    /// Audit column: last mutation time.
    pub updated_at: DateTime<Utc>,
}

impl Inspection {
    /// Open a new in-progress inspection around the given content.
    pub fn new_in_progress(content: InspectionContent, now: DateTime<Utc>) -> Self {
        Self {
            id: InspectionId::new(),
            content,
            status: InspectionStatus::InProgress,
            content_hash: None,
            previous_hash: None,
            inspector_signature: None,
            signed_at: None,
            declared_result: None,
            computed_result: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// A partial update applied to an in-progress inspection.
///
/// `Some` fields are written; `None` fields are left untouched. The patch
/// can only reach content fields. Hash, signature, and status are not
/// expressible here by construction.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InspectionPatch {
    /// Replace the GPS fix.
    pub location: Option<GeoPoint>,
    /// Replace the inspection type.
    pub inspection_type: Option<InspectionType>,
    /// Replace the gauge reading.
    pub gauge_pressure_psi: Option<f64>,
    /// Replace the measured weight.
    pub weight_kg: Option<f64>,
    /// Replace the damage description.
    pub damage_description: Option<String>,
    /// Replace the inspector notes.
    pub notes: Option<String>,
    /// Replace the needs-service flag.
    pub needs_service: Option<bool>,
    /// Replace the service reason.
    pub service_reason: Option<String>,
    /// Replace the needs-replacement flag.
    pub needs_replacement: Option<bool>,
    /// Replace the replacement reason.
    pub replacement_reason: Option<String>,
    /// Replace the ordered photo reference list.
    pub photo_refs: Option<Vec<String>>,
}

/// What the caller gets back from a successful completion.
///
/// Every field here is also persisted on the record; the receipt exists so
/// the API layer can hand the integrity evidence to the client without a
/// second fetch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionReceipt {
    /// The inspection that was sealed.
    pub inspection_id: InspectionId,
    /// SHA-256 (hex) of the canonical content.
    pub content_hash: String,
    /// Chain link to the asset's prior completed inspection, if any.
    pub previous_hash: Option<String>,
    /// HMAC attestation over (inspector, hash, signed_at).
    pub signature: String,
    /// The signing instant.
    pub signed_at: DateTime<Utc>,
    /// The authoritative pass/fail computed from the critical checks.
    pub computed_result: InspectionResult,
}
