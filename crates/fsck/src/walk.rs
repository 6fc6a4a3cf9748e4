//! Reference walker
//!
//! Enumerates the objects an object directly references, in a
//! kind-dependent order, without touching the backing store.

use strata_core::tree::EntryIter;
use strata_core::{Commit, Object, ObjectKind, ObjectRef, Tag, Tree};

/// Enumerate the direct references of `obj`
///
/// The callback receives each referenced object and the kind the reference
/// declares (`None` when any kind is acceptable, as for a tag's target). A
/// negative callback return aborts the walk and is passed through;
/// otherwise the first non-zero return is remembered and returned once
/// every reference has been visited. Returns -1 when the object's cached
/// fields or payload are missing or malformed.
pub fn walk<F>(obj: ObjectRef<'_>, callback: &mut F) -> i32
where
    F: FnMut(&Object, Option<ObjectKind>) -> i32,
{
    match obj {
        ObjectRef::Blob(_) => 0,
        ObjectRef::Tree(tree) => walk_tree(tree, callback),
        ObjectRef::Commit(commit) => walk_commit(commit, callback),
        ObjectRef::Tag(tag) => walk_tag(tag, callback),
    }
}

fn walk_tree<F>(tree: &Tree, callback: &mut F) -> i32
where
    F: FnMut(&Object, Option<ObjectKind>) -> i32,
{
    let Some(payload) = tree.payload.as_deref() else {
        return -1;
    };

    let mut res = 0;
    for entry in EntryIter::new(payload) {
        let Ok(entry) = entry else {
            return -1;
        };
        if entry.mode.is_submodule() {
            continue;
        }
        let result = if entry.mode.is_dir() {
            let referenced = Object {
                id: entry.oid,
                kind: ObjectKind::Tree,
            };
            callback(&referenced, Some(ObjectKind::Tree))
        } else if entry.mode.is_file() || entry.mode.is_symlink() {
            let referenced = Object {
                id: entry.oid,
                kind: ObjectKind::Blob,
            };
            callback(&referenced, Some(ObjectKind::Blob))
        } else {
            tracing::error!(
                "in tree {}: entry {} has bad mode {:06o}",
                tree.id,
                String::from_utf8_lossy(entry.name),
                entry.mode.0
            );
            -1
        };
        if result < 0 {
            return result;
        }
        if res == 0 {
            res = result;
        }
    }
    res
}

fn walk_commit<F>(commit: &Commit, callback: &mut F) -> i32
where
    F: FnMut(&Object, Option<ObjectKind>) -> i32,
{
    let Some(tree) = commit.tree else {
        return -1;
    };
    let referenced = Object {
        id: tree,
        kind: ObjectKind::Tree,
    };
    let result = callback(&referenced, Some(ObjectKind::Tree));
    if result < 0 {
        return result;
    }
    let mut res = result;

    for &parent in &commit.parents {
        let referenced = Object {
            id: parent,
            kind: ObjectKind::Commit,
        };
        let result = callback(&referenced, Some(ObjectKind::Commit));
        if result < 0 {
            return result;
        }
        if res == 0 {
            res = result;
        }
    }
    res
}

fn walk_tag<F>(tag: &Tag, callback: &mut F) -> i32
where
    F: FnMut(&Object, Option<ObjectKind>) -> i32,
{
    match &tag.tagged {
        Some(tagged) => callback(tagged, None),
        None => -1,
    }
}
