//! Format validators for commit and tag payloads, plus the dispatcher
//!
//! Commit and tag checks report in scan order and short-circuit on the
//! first non-zero sink return; a zero return from a report always means
//! "keep parsing", even when the finding itself was suppressed.

use crate::catalog::MessageId;
use crate::policy::FsckOptions;
use crate::report::report;
use crate::tree::check_tree;
use strata_core::{Commit, Object, ObjectId, ObjectKind, ObjectRef, ObjectStore, Tag};

/// Validate an object's canonical byte form
///
/// `raw` supplies the payload when the caller already holds it; otherwise
/// commits and trees fall back to their cached payload and tags are read
/// from the store. Returns a negative value on structural failure, zero
/// when nothing surfaced, or the sum of sink returns for emitted
/// diagnostics.
pub fn check(
    obj: ObjectRef<'_>,
    raw: Option<&[u8]>,
    store: &dyn ObjectStore,
    options: &mut FsckOptions,
) -> i32 {
    match obj {
        ObjectRef::Blob(_) => 0,
        ObjectRef::Tree(tree) => check_tree(tree, raw, store, options),
        ObjectRef::Commit(commit) => check_commit(commit, raw, store, options),
        ObjectRef::Tag(tag) => check_tag(tag, raw, store, options),
    }
}

/// Scan a header block for its terminating blank line
///
/// A NUL is never valid inside headers; end-of-input is accepted only when
/// the final byte is a newline (a header-only object has no body).
fn verify_headers(data: &[u8], obj: &Object, options: &mut FsckOptions) -> i32 {
    for (i, &byte) in data.iter().enumerate() {
        match byte {
            0 => {
                return report(
                    options,
                    Some(obj),
                    MessageId::NulInHeader,
                    format_args!("unterminated header: NUL at offset {}", i),
                )
            }
            b'\n' if data.get(i + 1) == Some(&b'\n') => return 0,
            _ => {}
        }
    }
    if data.last() == Some(&b'\n') {
        return 0;
    }
    report(
        options,
        Some(obj),
        MessageId::UnterminatedHeader,
        format_args!("unterminated header"),
    )
}

/// Consume `40-hex '\n'`, always advancing one full record (clamped to the
/// end of input when the payload is shorter)
fn parse_oid_line(buf: &[u8]) -> (Option<ObjectId>, &[u8]) {
    let oid = buf
        .get(..40)
        .and_then(ObjectId::from_hex_bytes)
        .filter(|_| buf.get(40) == Some(&b'\n'));
    let rest = &buf[buf.len().min(41)..];
    (oid, rest)
}

/// Validate one `<name> SP <email> SP <epoch> SP <tz>` identity line
///
/// Returns the report outcome and the cursor advanced past the line's
/// newline; the cursor advances even when the line is rejected, so callers
/// can keep parsing after a suppressed finding.
fn check_ident<'a>(
    buf: &'a [u8],
    obj: &Object,
    store: &dyn ObjectStore,
    options: &mut FsckOptions,
) -> (i32, &'a [u8]) {
    let line_end = buf
        .iter()
        .position(|&b| b == b'\n')
        .map(|i| i + 1)
        .unwrap_or(buf.len());
    let rest = &buf[line_end..];

    let fail = |options: &mut FsckOptions, id: MessageId, what: &str| -> i32 {
        report(
            options,
            Some(obj),
            id,
            format_args!("invalid author/committer line - {}", what),
        )
    };
    let at = |i: usize| buf.get(i).copied();

    if at(0) == Some(b'<') {
        return (
            fail(
                options,
                MessageId::MissingNameBeforeEmail,
                "missing space before email",
            ),
            rest,
        );
    }
    let mut p = 0;
    while at(p).is_some_and(|b| !matches!(b, b'<' | b'>' | b'\n')) {
        p += 1;
    }
    match at(p) {
        Some(b'>') => return (fail(options, MessageId::BadName, "bad name"), rest),
        Some(b'<') => {}
        _ => return (fail(options, MessageId::MissingEmail, "missing email"), rest),
    }
    if buf[p - 1] != b' ' {
        return (
            fail(
                options,
                MessageId::MissingSpaceBeforeEmail,
                "missing space before email",
            ),
            rest,
        );
    }
    p += 1;
    while at(p).is_some_and(|b| !matches!(b, b'<' | b'>' | b'\n')) {
        p += 1;
    }
    if at(p) != Some(b'>') {
        return (fail(options, MessageId::BadEmail, "bad email"), rest);
    }
    p += 1;
    if at(p) != Some(b' ') {
        return (
            fail(
                options,
                MessageId::MissingSpaceBeforeDate,
                "missing space before date",
            ),
            rest,
        );
    }
    p += 1;
    if at(p) == Some(b'0') && at(p + 1) != Some(b' ') {
        return (
            fail(options, MessageId::ZeroPaddedDate, "zero-padded date"),
            rest,
        );
    }
    let digits_start = p;
    let mut epoch: u64 = 0;
    let mut overflowed = false;
    while let Some(digit) = at(p).filter(u8::is_ascii_digit) {
        match epoch
            .checked_mul(10)
            .and_then(|v| v.checked_add(u64::from(digit - b'0')))
        {
            Some(value) => epoch = value,
            None => {
                overflowed = true;
                epoch = u64::MAX;
            }
        }
        p += 1;
    }
    if overflowed || store.date_overflows(epoch) {
        return (
            fail(
                options,
                MessageId::BadDateOverflow,
                "date causes integer overflow",
            ),
            rest,
        );
    }
    if p == digits_start || at(p) != Some(b' ') {
        return (fail(options, MessageId::BadDate, "bad date"), rest);
    }
    p += 1;
    let tz_ok = matches!(at(p), Some(b'+') | Some(b'-'))
        && (1..=4).all(|i| at(p + i).is_some_and(|b| b.is_ascii_digit()))
        && at(p + 5) == Some(b'\n');
    if !tz_ok {
        return (fail(options, MessageId::BadTimezone, "bad time zone"), rest);
    }
    (0, rest)
}

fn check_commit(
    commit: &Commit,
    raw: Option<&[u8]>,
    store: &dyn ObjectStore,
    options: &mut FsckOptions,
) -> i32 {
    let Some(payload) = raw.or(commit.payload.as_deref()) else {
        return -1;
    };
    let obj = Object {
        id: commit.id,
        kind: ObjectKind::Commit,
    };

    if verify_headers(payload, &obj, options) != 0 {
        return -1;
    }

    let Some(after_tree) = payload.strip_prefix(b"tree ") else {
        return report(
            options,
            Some(&obj),
            MessageId::MissingTree,
            format_args!("invalid format - expected 'tree' line"),
        );
    };
    let (tree_oid, mut buf) = parse_oid_line(after_tree);
    if tree_oid.is_none() {
        let err = report(
            options,
            Some(&obj),
            MessageId::BadTreeSha1,
            format_args!("invalid 'tree' line format - bad sha1"),
        );
        if err != 0 {
            return err;
        }
    }

    let mut parent_line_count = 0usize;
    while let Some(after_parent) = buf.strip_prefix(b"parent ") {
        let (parent_oid, rest) = parse_oid_line(after_parent);
        if parent_oid.is_none() {
            let err = report(
                options,
                Some(&obj),
                MessageId::BadParentSha1,
                format_args!("invalid 'parent' line format - bad sha1"),
            );
            if err != 0 {
                return err;
            }
        }
        buf = rest;
        parent_line_count += 1;
    }

    let parent_count = commit.parents.len();
    match store.graft(&commit.id) {
        Some(graft) => {
            let consistent = match graft.parent_count {
                // Shallow commit
                None => parent_count == 0,
                Some(expected) => expected == parent_count,
            };
            if !consistent {
                let err = report(
                    options,
                    Some(&obj),
                    MessageId::MissingGraft,
                    format_args!("graft objects missing"),
                );
                if err != 0 {
                    return err;
                }
            }
        }
        None => {
            if parent_count != parent_line_count {
                let err = report(
                    options,
                    Some(&obj),
                    MessageId::MissingParent,
                    format_args!("parent objects missing"),
                );
                if err != 0 {
                    return err;
                }
            }
        }
    }

    let mut author_count = 0usize;
    while let Some(after_author) = buf.strip_prefix(b"author ") {
        author_count += 1;
        let (err, rest) = check_ident(after_author, &obj, store, options);
        if err != 0 {
            return err;
        }
        buf = rest;
    }
    let err = if author_count < 1 {
        report(
            options,
            Some(&obj),
            MessageId::MissingAuthor,
            format_args!("invalid format - expected 'author' line"),
        )
    } else if author_count > 1 {
        report(
            options,
            Some(&obj),
            MessageId::MultipleAuthors,
            format_args!("invalid format - multiple 'author' lines"),
        )
    } else {
        0
    };
    if err != 0 {
        return err;
    }

    let Some(after_committer) = buf.strip_prefix(b"committer ") else {
        return report(
            options,
            Some(&obj),
            MessageId::MissingCommitter,
            format_args!("invalid format - expected 'committer' line"),
        );
    };
    let (err, _) = check_ident(after_committer, &obj, store, options);
    if err != 0 {
        return err;
    }

    if commit.tree.is_none() {
        return report(
            options,
            Some(&obj),
            MessageId::BadTree,
            format_args!(
                "could not load commit's tree {}",
                tree_oid.unwrap_or(ObjectId::NULL)
            ),
        );
    }
    0
}

fn check_tag(
    tag: &Tag,
    raw: Option<&[u8]>,
    store: &dyn ObjectStore,
    options: &mut FsckOptions,
) -> i32 {
    let obj = Object {
        id: tag.id,
        kind: ObjectKind::Tag,
    };

    let loaded;
    let payload: &[u8] = match raw {
        Some(data) => data,
        None => match store.read_object(&tag.id) {
            Ok((kind, data)) => {
                if kind != ObjectKind::Tag {
                    return report(
                        options,
                        Some(&obj),
                        MessageId::TagObjectNotTag,
                        format_args!("expected tag got {}", kind),
                    );
                }
                loaded = data;
                &loaded
            }
            Err(_) => {
                return report(
                    options,
                    Some(&obj),
                    MessageId::MissingTagObject,
                    format_args!("cannot read tag object"),
                );
            }
        },
    };

    let ret = verify_headers(payload, &obj, options);
    if ret != 0 {
        return ret;
    }

    let Some(after_object) = payload.strip_prefix(b"object ") else {
        return report(
            options,
            Some(&obj),
            MessageId::MissingObject,
            format_args!("invalid format - expected 'object' line"),
        );
    };
    let (oid, buf) = parse_oid_line(after_object);
    if oid.is_none() {
        let err = report(
            options,
            Some(&obj),
            MessageId::BadObjectSha1,
            format_args!("invalid 'object' line format - bad sha1"),
        );
        if err != 0 {
            return err;
        }
    }

    let Some(after_type) = buf.strip_prefix(b"type ") else {
        return report(
            options,
            Some(&obj),
            MessageId::MissingTypeEntry,
            format_args!("invalid format - expected 'type' line"),
        );
    };
    let Some(eol) = after_type.iter().position(|&b| b == b'\n') else {
        return report(
            options,
            Some(&obj),
            MessageId::MissingType,
            format_args!("invalid format - unexpected end after 'type' line"),
        );
    };
    if ObjectKind::from_name(&after_type[..eol]).is_none() {
        let err = report(
            options,
            Some(&obj),
            MessageId::BadType,
            format_args!("invalid 'type' value"),
        );
        if err != 0 {
            return err;
        }
    }
    let buf = &after_type[eol + 1..];

    let Some(after_tag) = buf.strip_prefix(b"tag ") else {
        return report(
            options,
            Some(&obj),
            MessageId::MissingTagEntry,
            format_args!("invalid format - expected 'tag' line"),
        );
    };
    let Some(eol) = after_tag.iter().position(|&b| b == b'\n') else {
        return report(
            options,
            Some(&obj),
            MessageId::MissingTag,
            format_args!("invalid format - unexpected end after 'type' line"),
        );
    };
    let name = String::from_utf8_lossy(&after_tag[..eol]);
    if !store.valid_ref_name(&format!("refs/tags/{}", name)) {
        let err = report(
            options,
            Some(&obj),
            MessageId::BadTagName,
            format_args!("invalid 'tag' name: {}", name),
        );
        if err != 0 {
            return err;
        }
    }
    let buf = &after_tag[eol + 1..];

    let ret = match buf.strip_prefix(b"tagger ") {
        // Early tags carry no 'tagger' line; info-level by default
        None => report(
            options,
            Some(&obj),
            MessageId::MissingTaggerEntry,
            format_args!("invalid format - expected 'tagger' line"),
        ),
        Some(after_tagger) => check_ident(after_tagger, &obj, store, options).0,
    };
    if ret != 0 {
        return ret;
    }

    if tag.tagged.is_none() {
        return report(
            options,
            Some(&obj),
            MessageId::BadTagObject,
            format_args!("could not load tagged object"),
        );
    }
    0
}
