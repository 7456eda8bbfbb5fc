//! # firemark-integrity
//!
//! The pure cryptographic leaves of the FIREMARK inspection integrity
//! core: canonical byte encoding, SHA-256 content hashing, and HMAC-SHA256
//! inspector attestation.
//!
//! Everything in this crate is deterministic and side-effect free. The
//! lifecycle orchestrator in `firemark-core` decides *when* these run;
//! this crate only decides *what bytes* they produce.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use firemark_integrity::{compute_hash, InspectorSigner, SigningKey};
//!
//! let key = SigningKey::from_env("FIREMARK_SIGNING_KEY")?;
//! let signer = InspectorSigner::new(key);
//! let hash = compute_hash(&content)?;
//! let signature = signer.sign(&inspector_id, &hash, &now);
//! ```

pub mod canonical;
pub mod hash;
pub mod sign;

pub use canonical::{canonical_timestamp, canonicalize, CANONICAL_VERSION};
pub use hash::{compute_hash, verify_hash};
pub use sign::{InspectorSigner, SigningKey};
