//! Strata Core - Object model for the Strata content-addressed store
//!
//! This crate provides the foundational object layer:
//! - SHA-1 object identifiers (Git-compatible)
//! - Object kinds and lightweight handles with parsed fields
//! - The canonical tree-entry codec
//! - The `ObjectStore` collaborator trait and an in-memory implementation

pub mod hash;
pub mod object;
pub mod store;
pub mod tree;

// Re-export main types for convenience
pub use hash::{hash_object, ObjectId};
pub use object::{Blob, Commit, Object, ObjectKind, ObjectRef, Tag, Tree};
pub use store::{Graft, MemoryStore, ObjectStore};
pub use tree::{Entry, EntryIter, EntryMode};

/// Common result type used throughout strata-core
pub type Result<T> = anyhow::Result<T>;
