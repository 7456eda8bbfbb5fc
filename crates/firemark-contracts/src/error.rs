//! Error taxonomy for the FIREMARK integrity core.
//!
//! All fallible operations return `FiremarkResult<T>`. Verification
//! mismatches are deliberately NOT errors: a failed integrity check is a
//! first-class finding carried in `VerificationResult`, and conflating it
//! with a transient store failure is the one mistake this subsystem must
//! never make.

use thiserror::Error;

use crate::inspection::{InspectionId, InspectionStatus};

/// The unified error type for the FIREMARK crates.
#[derive(Debug, Error)]
pub enum FiremarkError {
    /// An operation was attempted against the wrong lifecycle state.
    ///
    /// Recoverable: the caller chose an operation the current status does
    /// not permit (e.g. updating a completed inspection).
    #[error("operation '{operation}' not allowed while inspection is {state}", state = .status.as_str())]
    InvalidState {
        operation: String,
        status: InspectionStatus,
    },

    /// No inspection exists with the given identifier.
    #[error("inspection {inspection_id} not found")]
    NotFound { inspection_id: InspectionId },

    /// Content could not be canonicalized.
    ///
    /// Indicates a data-integrity bug upstream (e.g. a completion attempt
    /// with unanswered critical checklist items). Surfaced, never swallowed.
    #[error("content cannot be canonicalized: {reason}")]
    Serialization { reason: String },

    /// The signing key is missing or unusable.
    ///
    /// Fatal at startup: a process without a usable key must refuse to
    /// serve completion requests, because an unattested inspection record
    /// must never be producible.
    #[error("signing key unavailable: {reason}")]
    SigningUnavailable { reason: String },

    /// The underlying store failed.
    ///
    /// Transient: eligible for ordinary caller-level retry. Never reported
    /// as a verification failure.
    #[error("inspection store error: {reason}")]
    Store { reason: String },
}

/// Convenience alias used throughout the FIREMARK crates.
pub type FiremarkResult<T> = Result<T, FiremarkError>;
