//! Store collaborator surface
//!
//! The checker calls into the backing store through [`ObjectStore`]; it
//! never implements retrieval itself. [`MemoryStore`] is the in-memory
//! implementation used by tests and small tools.

use crate::hash::{hash_object, ObjectId};
use crate::object::ObjectKind;
use anyhow::Result;
use std::collections::HashMap;

/// External record overriding a commit's declared parent set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Graft {
    /// Expected parent count; None marks a shallow commit
    pub parent_count: Option<usize>,
}

/// Access to the backing store and host-specific predicates
pub trait ObjectStore {
    /// Load an object's kind and canonical payload by hash
    fn read_object(&self, id: &ObjectId) -> Result<(ObjectKind, Vec<u8>)>;

    /// Graft record for a commit, if any
    fn graft(&self, _id: &ObjectId) -> Option<Graft> {
        None
    }

    /// Whether `name` is an HFS-normalization alias of `.git`
    fn is_hfs_dotgit(&self, _name: &[u8]) -> bool {
        false
    }

    /// Whether `name` is an NTFS short-name alias of `.git`
    fn is_ntfs_dotgit(&self, _name: &[u8]) -> bool {
        false
    }

    /// Reference-name well-formedness
    fn valid_ref_name(&self, _name: &str) -> bool {
        true
    }

    /// Whether an epoch value falls outside the representable time domain
    fn date_overflows(&self, epoch: u64) -> bool {
        epoch > i64::MAX as u64
    }
}

/// In-memory store keyed by canonical identity hash
#[derive(Debug, Default)]
pub struct MemoryStore {
    objects: HashMap<ObjectId, (ObjectKind, Vec<u8>)>,
    grafts: HashMap<ObjectId, Graft>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern an object, returning its canonical identity hash
    pub fn insert(&mut self, kind: ObjectKind, payload: Vec<u8>) -> ObjectId {
        let id = hash_object(kind, &payload);
        self.objects.insert(id, (kind, payload));
        id
    }

    /// Register a graft record for a commit
    pub fn add_graft(&mut self, id: ObjectId, graft: Graft) {
        self.grafts.insert(id, graft);
    }
}

impl ObjectStore for MemoryStore {
    fn read_object(&self, id: &ObjectId) -> Result<(ObjectKind, Vec<u8>)> {
        self.objects
            .get(id)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("object not found: {}", id))
    }

    fn graft(&self, id: &ObjectId) -> Option<Graft> {
        self.grafts.get(id).copied()
    }
}
