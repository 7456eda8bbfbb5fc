//! # firemark-core
//!
//! The orchestrating heart of the FIREMARK inspection integrity core:
//!
//! - The `InspectionStore` trait, the only seam persistence plugs into
//! - The `ChainLinker`, which resolves and validates per-asset hash chains
//! - The `Lifecycle` state machine, the sole mutation path, which decides
//!   exactly when hashing, chain linking, and signing happen
//!
//! ## Usage
//!
//! ```rust,ignore
//! use firemark_core::{Lifecycle, traits::InspectionStore};
//!
//! let lifecycle = Lifecycle::new(store, signer);
//! let id = lifecycle.create(asset, inspector, InspectionType::Monthly)?;
//! lifecycle.record_checklist_responses(&id, &responses)?;
//! let receipt = lifecycle.complete(&id, InspectionResult::Pass, None)?;
//! ```

pub mod chain;
pub mod lifecycle;
pub mod traits;

pub use chain::ChainLinker;
pub use lifecycle::Lifecycle;
pub use traits::InspectionStore;
