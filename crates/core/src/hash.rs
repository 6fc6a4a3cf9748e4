//! SHA-1 object identifiers for Git-compatible content-addressed storage

use crate::object::ObjectKind;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use sha1::{Digest, Sha1};

/// A 20-byte object identity hash (SHA-1, Git-compatible)
#[derive(Copy, Clone, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
pub struct ObjectId([u8; 20]);

impl ObjectId {
    /// The all-zero identifier
    pub const NULL: ObjectId = ObjectId([0; 20]);

    /// Create a new ObjectId from bytes
    pub const fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Get the hash as a byte slice
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// True when every byte is zero
    pub fn is_null(&self) -> bool {
        self.0 == [0; 20]
    }

    /// Convert to hex string (40 characters for SHA-1)
    pub fn to_hex(&self) -> String {
        const HEX_CHARS: &[u8] = b"0123456789abcdef";
        let mut hex = String::with_capacity(40);
        for &byte in &self.0 {
            hex.push(HEX_CHARS[(byte >> 4) as usize] as char);
            hex.push(HEX_CHARS[(byte & 0xf) as usize] as char);
        }
        hex
    }

    /// Parse from hex string (40 characters for SHA-1)
    pub fn from_hex(hex: &str) -> Result<Self> {
        if hex.len() != 40 {
            anyhow::bail!(
                "Invalid hex length: expected 40 characters (SHA-1), got {}",
                hex.len()
            );
        }
        Self::from_hex_bytes(hex.as_bytes())
            .ok_or_else(|| anyhow::anyhow!("Invalid hex character in '{}'", hex))
    }

    /// Parse from a 40-byte hex slice, as found inline in object payloads
    pub fn from_hex_bytes(hex: &[u8]) -> Option<Self> {
        if hex.len() != 40 {
            return None;
        }
        let mut bytes = [0u8; 20];
        for i in 0..20 {
            let high = hex_char_to_nibble(hex[i * 2])?;
            let low = hex_char_to_nibble(hex[i * 2 + 1])?;
            bytes[i] = (high << 4) | low;
        }
        Some(Self(bytes))
    }
}

/// Helper function to convert a hex character to a nibble
fn hex_char_to_nibble(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

impl std::fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ObjectId({})", self.to_hex())
    }
}

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

/// Hash an object in its canonical serialization: `"<kind> <size>\0<payload>"`
///
/// This produces the identity hash that addresses the object in the store,
/// exactly as `git hash-object -t <kind>` would.
pub fn hash_object(kind: ObjectKind, payload: &[u8]) -> ObjectId {
    let header = format!("{} {}\0", kind.name(), payload.len());
    let mut hasher = Sha1::new();
    hasher.update(header.as_bytes());
    hasher.update(payload);
    let result = hasher.finalize();
    let mut bytes = [0u8; 20];
    bytes.copy_from_slice(&result);
    ObjectId::from_bytes(bytes)
}
