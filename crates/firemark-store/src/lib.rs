//! # firemark-store
//!
//! The in-memory reference implementation of the `InspectionStore` trait
//! from `firemark-core`. Suitable for tests, demos, and as the template
//! for a real persistence adapter.

pub mod memory;

pub use memory::InMemoryInspectionStore;
