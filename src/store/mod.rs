//! store
//!
//! Persistent storage primitives.
//!
//! # Modules
//!
//! - [`objects`] - Content-addressed, type-tagged object store
//! - [`refs`] - Named references, direct or symbolic
//! - [`index`] - Staging index mapping paths to blob ids

pub mod index;
pub mod objects;
pub mod refs;

pub use index::Index;
pub use objects::ObjectStore;
pub use refs::{RefStore, RefValue};
