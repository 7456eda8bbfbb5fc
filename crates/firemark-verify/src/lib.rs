//! # firemark-verify
//!
//! Read-only integrity verification for completed inspections. The
//! `VerifyEngine` re-derives the content hash, the inspector signature,
//! and the chain link from what the store holds now, and reports a
//! structured `VerificationResult` naming any check that failed.

pub mod engine;

pub use engine::VerifyEngine;
