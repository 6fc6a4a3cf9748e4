//! Skip-list of object hashes whose diagnostics are suppressed

use anyhow::{bail, Context, Result};
use std::fs;
use std::path::Path;
use strata_core::ObjectId;

/// Record length: 40 hex characters plus a newline
const RECORD_LEN: usize = 41;

/// Ordered set of object hashes to suppress
///
/// Appends track whether the list stays in ascending hash order; a sorted
/// list is binary-searched on lookup, an unsorted one scanned linearly.
#[derive(Debug)]
pub struct SkipList {
    hashes: Vec<ObjectId>,
    sorted: bool,
}

impl Default for SkipList {
    fn default() -> Self {
        Self::new()
    }
}

impl SkipList {
    pub fn new() -> Self {
        Self {
            hashes: Vec::new(),
            sorted: true,
        }
    }

    /// Append hashes from a file of fixed-stride `HEX40 '\n'` records
    ///
    /// Any malformed or short record fails the whole load.
    pub fn load(&mut self, path: &Path) -> Result<()> {
        let data = fs::read(path)
            .with_context(|| format!("Could not open skip list: {}", path.display()))?;
        if data.len() % RECORD_LEN != 0 {
            bail!("Short skip list record in {}", path.display());
        }
        for record in data.chunks(RECORD_LEN) {
            let hex = &record[..RECORD_LEN - 1];
            if record[RECORD_LEN - 1] != b'\n' {
                bail!("Invalid SHA-1: {}", String::from_utf8_lossy(hex));
            }
            let id = ObjectId::from_hex_bytes(hex)
                .with_context(|| format!("Invalid SHA-1: {}", String::from_utf8_lossy(hex)))?;
            self.push(id);
        }
        Ok(())
    }

    /// Append one hash, downgrading to unsorted on out-of-order insertion
    pub fn push(&mut self, id: ObjectId) {
        if self.sorted {
            if let Some(last) = self.hashes.last() {
                if *last > id {
                    self.sorted = false;
                }
            }
        }
        self.hashes.push(id);
    }

    pub fn contains(&self, id: &ObjectId) -> bool {
        if self.sorted {
            self.hashes.binary_search(id).is_ok()
        } else {
            self.hashes.iter().any(|hash| hash == id)
        }
    }

    pub fn len(&self) -> usize {
        self.hashes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hashes.is_empty()
    }

    pub fn is_sorted(&self) -> bool {
        self.sorted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn id(byte: u8) -> ObjectId {
        ObjectId::from_bytes([byte; 20])
    }

    fn skiplist_file(lines: &[&str]) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        for line in lines {
            writeln!(file, "{}", line).unwrap();
        }
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_empty_list() {
        let list = SkipList::new();
        assert!(list.is_empty());
        assert!(list.is_sorted());
        assert!(!list.contains(&id(0)));
    }

    #[test]
    fn test_push_keeps_sorted_flag() {
        let mut list = SkipList::new();
        list.push(id(1));
        list.push(id(2));
        list.push(id(3));
        assert!(list.is_sorted());
        assert!(list.contains(&id(2)));
        assert!(!list.contains(&id(4)));
    }

    #[test]
    fn test_out_of_order_push_downgrades() {
        let mut list = SkipList::new();
        list.push(id(5));
        list.push(id(3));
        assert!(!list.is_sorted());
        // Linear lookup still finds every element
        assert!(list.contains(&id(5)));
        assert!(list.contains(&id(3)));
        assert!(!list.contains(&id(4)));
    }

    #[test]
    fn test_load_sorted_file() {
        let file = skiplist_file(&[&"11".repeat(20), &"22".repeat(20), &"33".repeat(20)]);
        let mut list = SkipList::new();
        list.load(file.path()).unwrap();
        assert_eq!(list.len(), 3);
        assert!(list.is_sorted());
        assert!(list.contains(&id(0x22)));
    }

    #[test]
    fn test_load_unsorted_file() {
        let file = skiplist_file(&[&"22".repeat(20), &"11".repeat(20)]);
        let mut list = SkipList::new();
        list.load(file.path()).unwrap();
        assert!(!list.is_sorted());
        assert!(list.contains(&id(0x11)));
    }

    #[test]
    fn test_load_missing_file() {
        let mut list = SkipList::new();
        assert!(list.load(Path::new("/no/such/skip-list")).is_err());
    }

    #[test]
    fn test_load_short_final_record() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{}", "11".repeat(20)).unwrap();
        // Final record is missing its newline
        write!(file, "{}", "22".repeat(20)).unwrap();
        file.flush().unwrap();

        let mut list = SkipList::new();
        assert!(list.load(file.path()).is_err());
    }

    #[test]
    fn test_load_bad_hex() {
        let file = skiplist_file(&[&"zz".repeat(20)]);
        let mut list = SkipList::new();
        assert!(list.load(file.path()).is_err());
    }

    #[test]
    fn test_load_record_without_newline_terminator() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        // 41 bytes, but the 41st is not a newline
        write!(file, "{}x", "11".repeat(20)).unwrap();
        file.flush().unwrap();

        let mut list = SkipList::new();
        assert!(list.load(file.path()).is_err());
    }

    #[test]
    fn test_load_appends_to_existing() {
        let mut list = SkipList::new();
        list.push(id(0x44));

        let file = skiplist_file(&[&"11".repeat(20)]);
        list.load(file.path()).unwrap();
        assert_eq!(list.len(), 2);
        // 0x11 after 0x44 is out of order
        assert!(!list.is_sorted());
        assert!(list.contains(&id(0x44)));
        assert!(list.contains(&id(0x11)));
    }
}
