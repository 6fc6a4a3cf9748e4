//! Object kinds and lightweight handles
//!
//! Objects are caller-owned; the checker borrows these views for the
//! duration of a check and never mutates them.

use crate::hash::ObjectId;
use std::fmt;

/// Kind of object in the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    Blob,
    Tree,
    Commit,
    Tag,
}

impl ObjectKind {
    /// Canonical kind name as it appears in object headers
    pub fn name(self) -> &'static str {
        match self {
            ObjectKind::Blob => "blob",
            ObjectKind::Tree => "tree",
            ObjectKind::Commit => "commit",
            ObjectKind::Tag => "tag",
        }
    }

    /// Resolve a kind name found in a payload, e.g. a tag's `type` line
    pub fn from_name(name: &[u8]) -> Option<ObjectKind> {
        match name {
            b"blob" => Some(ObjectKind::Blob),
            b"tree" => Some(ObjectKind::Tree),
            b"commit" => Some(ObjectKind::Commit),
            b"tag" => Some(ObjectKind::Tag),
            _ => None,
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A lightweight object handle: identity plus kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Object {
    pub id: ObjectId,
    pub kind: ObjectKind,
}

/// Blob view - the checker never inspects blob bytes
#[derive(Debug, Clone)]
pub struct Blob {
    pub id: ObjectId,
}

/// Tree view with its canonical entry bytes
#[derive(Debug, Clone)]
pub struct Tree {
    pub id: ObjectId,
    /// Canonical entry records, if already loaded
    pub payload: Option<Vec<u8>>,
}

/// Commit view with fields cached by the store
#[derive(Debug, Clone)]
pub struct Commit {
    pub id: ObjectId,
    /// Resolved tree pointer; None when the store could not resolve it
    pub tree: Option<ObjectId>,
    /// Parsed parent list
    pub parents: Vec<ObjectId>,
    /// Cached canonical payload, if already loaded
    pub payload: Option<Vec<u8>>,
}

/// Tag view with the tagged-object handle
#[derive(Debug, Clone)]
pub struct Tag {
    pub id: ObjectId,
    /// Handle of the tagged object; None when the store could not resolve it
    pub tagged: Option<Object>,
}

/// Borrowed reference to any object, as handed to the checker
#[derive(Debug, Clone, Copy)]
pub enum ObjectRef<'a> {
    Blob(&'a Blob),
    Tree(&'a Tree),
    Commit(&'a Commit),
    Tag(&'a Tag),
}

impl ObjectRef<'_> {
    pub fn id(&self) -> ObjectId {
        match self {
            ObjectRef::Blob(blob) => blob.id,
            ObjectRef::Tree(tree) => tree.id,
            ObjectRef::Commit(commit) => commit.id,
            ObjectRef::Tag(tag) => tag.id,
        }
    }

    pub fn kind(&self) -> ObjectKind {
        match self {
            ObjectRef::Blob(_) => ObjectKind::Blob,
            ObjectRef::Tree(_) => ObjectKind::Tree,
            ObjectRef::Commit(_) => ObjectKind::Commit,
            ObjectRef::Tag(_) => ObjectKind::Tag,
        }
    }

    pub fn as_object(&self) -> Object {
        Object {
            id: self.id(),
            kind: self.kind(),
        }
    }
}
