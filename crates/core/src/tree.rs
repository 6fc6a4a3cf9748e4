//! Canonical tree-entry codec
//!
//! A tree payload is a concatenation of records, each
//! `<octal-mode> SP <name> NUL <20-byte-hash>`. The iterator here is the
//! store-side counterpart the checker and the walker consume; the encoder
//! exists for stores and tests that build payloads.

use crate::hash::ObjectId;
use anyhow::{bail, Context, Result};

/// File mode of a tree entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryMode(pub u32);

impl EntryMode {
    pub const REGULAR: EntryMode = EntryMode(0o100644);
    pub const EXECUTABLE: EntryMode = EntryMode(0o100755);
    /// Group-writable regular file; accepted by lenient checking only
    pub const GROUP_WRITABLE: EntryMode = EntryMode(0o100664);
    pub const SYMLINK: EntryMode = EntryMode(0o120000);
    pub const DIRECTORY: EntryMode = EntryMode(0o040000);
    pub const SUBMODULE: EntryMode = EntryMode(0o160000);

    const KIND_MASK: u32 = 0o170000;

    pub fn is_dir(self) -> bool {
        self.0 & Self::KIND_MASK == 0o040000
    }

    pub fn is_file(self) -> bool {
        self.0 & Self::KIND_MASK == 0o100000
    }

    pub fn is_symlink(self) -> bool {
        self.0 & Self::KIND_MASK == 0o120000
    }

    pub fn is_submodule(self) -> bool {
        self.0 & Self::KIND_MASK == 0o160000
    }
}

/// One `(mode, name, hash)` triple within a tree payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Entry<'a> {
    pub mode: EntryMode,
    pub name: &'a [u8],
    pub oid: ObjectId,
    /// Whether the raw octal mode field began with `'0'`
    pub mode_zero_padded: bool,
}

/// Iterator over the entries of a canonical tree payload
///
/// Yields an `Err` and then terminates when a record is truncated or its
/// mode field is malformed.
pub struct EntryIter<'a> {
    rest: &'a [u8],
}

impl<'a> EntryIter<'a> {
    pub fn new(payload: &'a [u8]) -> Self {
        Self { rest: payload }
    }
}

impl<'a> Iterator for EntryIter<'a> {
    type Item = Result<Entry<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.rest.is_empty() {
            return None;
        }
        match parse_entry(self.rest) {
            Ok((entry, rest)) => {
                self.rest = rest;
                Some(Ok(entry))
            }
            Err(err) => {
                self.rest = &[];
                Some(Err(err))
            }
        }
    }
}

fn parse_entry(data: &[u8]) -> Result<(Entry<'_>, &[u8])> {
    let sp = data
        .iter()
        .position(|&b| b == b' ')
        .context("truncated tree entry: no space after mode")?;
    let mode_field = &data[..sp];
    if mode_field.is_empty() || mode_field.len() > 7 {
        bail!("bad tree entry mode field length: {}", mode_field.len());
    }
    let mut mode = 0u32;
    for &byte in mode_field {
        if !(b'0'..=b'7').contains(&byte) {
            bail!("non-octal byte in tree entry mode field");
        }
        mode = (mode << 3) | u32::from(byte - b'0');
    }

    let rest = &data[sp + 1..];
    let nul = rest
        .iter()
        .position(|&b| b == 0)
        .context("truncated tree entry: unterminated name")?;
    let name = &rest[..nul];
    let hash = rest
        .get(nul + 1..nul + 21)
        .context("truncated tree entry: short object id")?;
    let mut bytes = [0u8; 20];
    bytes.copy_from_slice(hash);

    let entry = Entry {
        mode: EntryMode(mode),
        name,
        oid: ObjectId::from_bytes(bytes),
        mode_zero_padded: mode_field[0] == b'0',
    };
    Ok((entry, &rest[nul + 21..]))
}

/// Append one canonical record with an explicit raw mode field
///
/// Tests use the raw form to produce zero-padded or otherwise nonstandard
/// mode fields.
pub fn encode_entry_raw(buf: &mut Vec<u8>, mode_field: &[u8], name: &[u8], oid: &ObjectId) {
    buf.extend_from_slice(mode_field);
    buf.push(b' ');
    buf.extend_from_slice(name);
    buf.push(0);
    buf.extend_from_slice(oid.as_bytes());
}

/// Append one canonical record with the standard octal rendering of `mode`
pub fn encode_entry(buf: &mut Vec<u8>, mode: EntryMode, name: &[u8], oid: &ObjectId) {
    encode_entry_raw(buf, format!("{:o}", mode.0).as_bytes(), name, oid);
}
