//! Tree format validation

use crate::catalog::MessageId;
use crate::policy::FsckOptions;
use crate::report::report;
use std::cmp::Ordering;
use strata_core::tree::{EntryIter, EntryMode};
use strata_core::{Object, ObjectKind, ObjectStore, Tree};

enum EntryOrder {
    Ordered,
    Unordered,
    Duplicate,
}

/// Entries sort in path order: a directory compares as if its name carried
/// a trailing `/`. A directory `a` therefore sorts after a file `a.c`,
/// because `a/` is greater than `a.c`.
fn verify_ordered(
    prev_mode: EntryMode,
    prev_name: &[u8],
    mode: EntryMode,
    name: &[u8],
) -> EntryOrder {
    let len = prev_name.len().min(name.len());
    match prev_name[..len].cmp(&name[..len]) {
        Ordering::Less => return EntryOrder::Ordered,
        Ordering::Greater => return EntryOrder::Unordered,
        Ordering::Equal => {}
    }

    // The shared prefix is identical; order on the next byte of each,
    // substituting '/' when a directory's name ended.
    let next_prev = prev_name.get(len).copied();
    let next = name.get(len).copied();
    if next_prev.is_none() && next.is_none() {
        // Same name twice, even as one blob and one tree
        return EntryOrder::Duplicate;
    }
    let c1 = next_prev.unwrap_or(if prev_mode.is_dir() { b'/' } else { 0 });
    let c2 = next.unwrap_or(if mode.is_dir() { b'/' } else { 0 });
    if c1 < c2 {
        EntryOrder::Ordered
    } else {
        EntryOrder::Unordered
    }
}

/// Validate a tree payload
///
/// The whole payload is scanned once, accumulating one flag per defect
/// class, and at most one diagnostic per class is emitted afterwards.
pub(crate) fn check_tree(
    tree: &Tree,
    raw: Option<&[u8]>,
    store: &dyn ObjectStore,
    options: &mut FsckOptions,
) -> i32 {
    let Some(payload) = raw.or(tree.payload.as_deref()) else {
        return -1;
    };
    let obj = Object {
        id: tree.id,
        kind: ObjectKind::Tree,
    };

    let mut has_null_sha1 = false;
    let mut has_full_path = false;
    let mut has_empty_name = false;
    let mut has_dot = false;
    let mut has_dotdot = false;
    let mut has_dotgit = false;
    let mut has_zero_pad = false;
    let mut has_bad_modes = false;
    let mut has_dup_entries = false;
    let mut not_properly_sorted = false;

    let mut prev: Option<(EntryMode, &[u8])> = None;
    for entry in EntryIter::new(payload) {
        let Ok(entry) = entry else {
            return -1;
        };

        has_null_sha1 |= entry.oid.is_null();
        has_full_path |= entry.name.contains(&b'/');
        has_empty_name |= entry.name.is_empty();
        has_dot |= entry.name == b".";
        has_dotdot |= entry.name == b"..";
        has_dotgit |= entry.name == b".git"
            || store.is_hfs_dotgit(entry.name)
            || store.is_ntfs_dotgit(entry.name);
        has_zero_pad |= entry.mode_zero_padded;

        match entry.mode.0 {
            // Standard modes
            0o100755 | 0o100644 | 0o120000 | 0o040000 | 0o160000 => {}
            // Nonstandard, but present in old archives; lenient mode keeps it
            0o100664 if !options.strict => {}
            _ => has_bad_modes = true,
        }

        if let Some((prev_mode, prev_name)) = prev {
            match verify_ordered(prev_mode, prev_name, entry.mode, entry.name) {
                EntryOrder::Unordered => not_properly_sorted = true,
                EntryOrder::Duplicate => has_dup_entries = true,
                EntryOrder::Ordered => {}
            }
        }
        prev = Some((entry.mode, entry.name));
    }

    let mut retval = 0;
    if has_null_sha1 {
        retval += report(
            options,
            Some(&obj),
            MessageId::NullSha1,
            format_args!("contains entries pointing to null sha1"),
        );
    }
    if has_full_path {
        retval += report(
            options,
            Some(&obj),
            MessageId::FullPathname,
            format_args!("contains full pathnames"),
        );
    }
    if has_empty_name {
        retval += report(
            options,
            Some(&obj),
            MessageId::EmptyName,
            format_args!("contains empty pathname"),
        );
    }
    if has_dot {
        retval += report(
            options,
            Some(&obj),
            MessageId::HasDot,
            format_args!("contains '.'"),
        );
    }
    if has_dotdot {
        retval += report(
            options,
            Some(&obj),
            MessageId::HasDotdot,
            format_args!("contains '..'"),
        );
    }
    if has_dotgit {
        retval += report(
            options,
            Some(&obj),
            MessageId::HasDotgit,
            format_args!("contains '.git'"),
        );
    }
    if has_zero_pad {
        retval += report(
            options,
            Some(&obj),
            MessageId::ZeroPaddedFilemode,
            format_args!("contains zero-padded file modes"),
        );
    }
    if has_bad_modes {
        retval += report(
            options,
            Some(&obj),
            MessageId::BadFilemode,
            format_args!("contains bad file modes"),
        );
    }
    if has_dup_entries {
        retval += report(
            options,
            Some(&obj),
            MessageId::DuplicateEntries,
            format_args!("contains duplicate file entries"),
        );
    }
    if not_properly_sorted {
        retval += report(
            options,
            Some(&obj),
            MessageId::TreeNotSorted,
            format_args!("not properly sorted"),
        );
    }
    retval
}
