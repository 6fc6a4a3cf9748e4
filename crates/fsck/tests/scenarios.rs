/// End-to-end checker scenarios
///
/// Each test drives the public surface the way a store's verification pass
/// would: build a canonical payload, hand the object to the checker with a
/// recording sink, and compare the delivered diagnostics and tallies.
use std::cell::RefCell;
use std::io::Write;
use std::rc::Rc;

use strata_core::tree::{encode_entry, EntryMode};
use strata_core::{hash_object, Commit, MemoryStore, Object, ObjectId, ObjectKind, ObjectRef, Tag, Tree};
use strata_fsck::{check, walk, FsckOptions, Severity, Sink};

type Event = (Option<ObjectId>, Severity, String);

struct RecordingSink {
    events: Rc<RefCell<Vec<Event>>>,
}

impl Sink for RecordingSink {
    fn emit(&mut self, object: Option<&Object>, severity: Severity, message: &str) -> i32 {
        self.events
            .borrow_mut()
            .push((object.map(|o| o.id), severity, message.to_string()));
        // Same contract as the stock sink: count errors, pass warnings
        if severity == Severity::Error {
            1
        } else {
            0
        }
    }
}

fn recording_options() -> (FsckOptions, Rc<RefCell<Vec<Event>>>) {
    let mut options = FsckOptions::new();
    let events = Rc::new(RefCell::new(Vec::new()));
    options.set_sink(Box::new(RecordingSink {
        events: events.clone(),
    }));
    (options, events)
}

fn two_author_commit() -> Commit {
    let payload = format!(
        "tree {}\n\
         author A <a@x> 1 +0000\n\
         author B <b@x> 2 +0000\n\
         committer C <c@x> 3 +0000\n\
         \n",
        "0".repeat(40)
    )
    .into_bytes();
    Commit {
        id: hash_object(ObjectKind::Commit, &payload),
        tree: Some(ObjectId::NULL),
        parents: Vec::new(),
        payload: Some(payload),
    }
}

#[test]
fn commit_with_two_authors_is_an_error() {
    let commit = two_author_commit();
    let (mut options, events) = recording_options();

    let ret = check(
        ObjectRef::Commit(&commit),
        None,
        &MemoryStore::new(),
        &mut options,
    );
    assert_eq!(ret, 1);

    let events = events.borrow();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].0, Some(commit.id));
    assert_eq!(events[0].1, Severity::Error);
    assert_eq!(
        events[0].2,
        "multipleAuthors: invalid format - multiple 'author' lines"
    );

    // The walker still yields exactly the tree reference
    let mut seen = Vec::new();
    let ret = walk(ObjectRef::Commit(&commit), &mut |referenced, expected| {
        seen.push((referenced.id, expected));
        0
    });
    assert_eq!(ret, 0);
    assert_eq!(seen, vec![(ObjectId::NULL, Some(ObjectKind::Tree))]);
}

#[test]
fn tag_without_tagger_is_quiet_unless_elevated() {
    let payload = format!("object {}\ntype commit\ntag v1\n\n", "1".repeat(40)).into_bytes();
    let tag = Tag {
        id: hash_object(ObjectKind::Tag, &payload),
        tagged: Some(Object {
            id: ObjectId::from_bytes([0x11; 20]),
            kind: ObjectKind::Commit,
        }),
    };

    // Info severity by default: nothing delivered
    let (mut options, events) = recording_options();
    let ret = check(
        ObjectRef::Tag(&tag),
        Some(&payload),
        &MemoryStore::new(),
        &mut options,
    );
    assert_eq!(ret, 0);
    assert!(events.borrow().is_empty());

    // Elevated by override: delivered as a warning
    let (mut options, events) = recording_options();
    options
        .apply_config_string("missingtaggerentry=warn")
        .unwrap();
    let ret = check(
        ObjectRef::Tag(&tag),
        Some(&payload),
        &MemoryStore::new(),
        &mut options,
    );
    assert_eq!(ret, 0);

    let events = events.borrow();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].1, Severity::Warn);
    assert_eq!(
        events[0].2,
        "missingTaggerEntry: invalid format - expected 'tagger' line"
    );
}

#[test]
fn tree_with_dotgit_entry_warns_and_strict_escalates() {
    let blob = ObjectId::from_hex(&"deadbeef".repeat(5)).unwrap();
    let mut payload = Vec::new();
    encode_entry(&mut payload, EntryMode::REGULAR, b".git", &blob);
    let tree = Tree {
        id: hash_object(ObjectKind::Tree, &payload),
        payload: Some(payload),
    };

    let (mut options, events) = recording_options();
    let ret = check(
        ObjectRef::Tree(&tree),
        None,
        &MemoryStore::new(),
        &mut options,
    );
    assert_eq!(ret, 0);
    {
        let events = events.borrow();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].1, Severity::Warn);
        assert_eq!(events[0].2, "hasDotgit: contains '.git'");
    }

    let (mut options, events) = recording_options();
    options.strict = true;
    let ret = check(
        ObjectRef::Tree(&tree),
        None,
        &MemoryStore::new(),
        &mut options,
    );
    assert_eq!(ret, 1);
    assert_eq!(events.borrow()[0].1, Severity::Error);
}

#[test]
fn unsorted_tree_is_an_error() {
    let mut payload = Vec::new();
    encode_entry(
        &mut payload,
        EntryMode::REGULAR,
        b"b",
        &ObjectId::from_bytes([1; 20]),
    );
    encode_entry(
        &mut payload,
        EntryMode::REGULAR,
        b"a",
        &ObjectId::from_bytes([2; 20]),
    );
    let tree = Tree {
        id: hash_object(ObjectKind::Tree, &payload),
        payload: Some(payload),
    };

    let (mut options, events) = recording_options();
    let ret = check(
        ObjectRef::Tree(&tree),
        None,
        &MemoryStore::new(),
        &mut options,
    );
    assert_eq!(ret, 1);
    let events = events.borrow();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].2, "treeNotSorted: not properly sorted");
}

#[test]
fn commit_with_zero_padded_date_is_an_error() {
    let payload = format!(
        "tree {}\n\
         author A <a@x> 01 +0000\n\
         committer C <c@x> 3 +0000\n\
         \n",
        "0".repeat(40)
    )
    .into_bytes();
    let commit = Commit {
        id: hash_object(ObjectKind::Commit, &payload),
        tree: Some(ObjectId::NULL),
        parents: Vec::new(),
        payload: Some(payload),
    };

    let (mut options, events) = recording_options();
    let ret = check(
        ObjectRef::Commit(&commit),
        None,
        &MemoryStore::new(),
        &mut options,
    );
    assert_eq!(ret, 1);
    assert_eq!(
        events.borrow()[0].2,
        "zeroPaddedDate: invalid author/committer line - zero-padded date"
    );
}

#[test]
fn skiplisted_object_is_fully_suppressed() {
    let commit = two_author_commit();

    let (mut options, events) = recording_options();
    options.skip_object(commit.id);
    let ret = check(
        ObjectRef::Commit(&commit),
        None,
        &MemoryStore::new(),
        &mut options,
    );
    assert_eq!(ret, 0);
    assert!(events.borrow().is_empty());
}

#[test]
fn skiplist_file_suppresses_via_config_string() {
    let commit = two_author_commit();

    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "{}", commit.id.to_hex()).unwrap();
    file.flush().unwrap();

    let (mut options, events) = recording_options();
    options
        .apply_config_string(&format!("skiplist={}", file.path().display()))
        .unwrap();

    let ret = check(
        ObjectRef::Commit(&commit),
        None,
        &MemoryStore::new(),
        &mut options,
    );
    assert_eq!(ret, 0);
    assert!(events.borrow().is_empty());
}

#[test]
fn valid_commit_checks_clean_and_walks_in_order() {
    let tree_id = ObjectId::from_hex("4b825dc642cb6eb9a060e54bf8d69288fbee4904").unwrap();
    let parent_a = ObjectId::from_bytes([0xaa; 20]);
    let parent_b = ObjectId::from_bytes([0xbb; 20]);
    let payload = format!(
        "tree {}\n\
         parent {}\n\
         parent {}\n\
         author A U Thor <author@example.com> 1234567890 -0700\n\
         committer C O Mitter <committer@example.com> 1234567890 -0700\n\
         \n\
         subject line\n",
        tree_id.to_hex(),
        parent_a.to_hex(),
        parent_b.to_hex()
    )
    .into_bytes();
    let commit = Commit {
        id: hash_object(ObjectKind::Commit, &payload),
        tree: Some(tree_id),
        parents: vec![parent_a, parent_b],
        payload: Some(payload),
    };

    let (mut options, events) = recording_options();
    let ret = check(
        ObjectRef::Commit(&commit),
        None,
        &MemoryStore::new(),
        &mut options,
    );
    assert_eq!(ret, 0);
    assert!(events.borrow().is_empty());

    let mut seen = Vec::new();
    let ret = walk(ObjectRef::Commit(&commit), &mut |referenced, expected| {
        seen.push((referenced.id, expected));
        0
    });
    assert_eq!(ret, 0);
    assert_eq!(
        seen,
        vec![
            (tree_id, Some(ObjectKind::Tree)),
            (parent_a, Some(ObjectKind::Commit)),
            (parent_b, Some(ObjectKind::Commit)),
        ]
    );
}
