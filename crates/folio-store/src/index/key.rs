//! Order-preserving index key encoding.
//!
//! Keys compare bytewise, so the encoding is chosen to make byte order equal
//! natural order:
//!
//! ```text
//! uint   : 8 bytes big-endian              42    -> 00 00 00 00 00 00 00 2a
//! string : UTF-8 bytes + 0x00 terminator   "cs"  -> 63 73 00
//! prefix : UTF-8 bytes, no terminator      "c"   -> 63
//! ```
//!
//! The terminator keeps `"ab"` ahead of `"abc"` and lets an exact-match scan
//! stop as soon as the key changes, while a prefix key (no terminator)
//! matches every string that starts with it.

use std::fmt;

use bytes::{BufMut, Bytes, BytesMut};
use folio_common::{STRING_KEY_TERMINATOR, UINT_KEY_WIDTH};

/// An encoded index key.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct IndexKey(Bytes);

impl IndexKey {
    /// The empty key. Sorts before every other key.
    pub const EMPTY: Self = Self(Bytes::new());

    /// Encodes an unsigned integer.
    pub fn from_uint(value: u64) -> Self {
        let mut buf = BytesMut::with_capacity(UINT_KEY_WIDTH);
        buf.put_u64(value);
        Self(buf.freeze())
    }

    /// Encodes a string, optionally folded to lowercase.
    pub fn from_text(value: &str, lowercase: bool) -> Self {
        let mut key = Self::prefix(value, lowercase).0.to_vec();
        key.push(STRING_KEY_TERMINATOR);
        Self(Bytes::from(key))
    }

    /// Encodes a string prefix: the string without its terminator.
    pub fn prefix(value: &str, lowercase: bool) -> Self {
        if lowercase {
            Self(Bytes::from(value.to_lowercase()))
        } else {
            Self(Bytes::copy_from_slice(value.as_bytes()))
        }
    }

    /// Returns the raw bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Returns the encoded length.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true for the empty key.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns true if this key begins with `prefix`.
    pub fn starts_with(&self, prefix: &IndexKey) -> bool {
        self.0.starts_with(&prefix.0)
    }
}

impl fmt::Debug for IndexKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "IndexKey(")?;
        for byte in self.0.iter() {
            write!(f, "{:02x}", byte)?;
        }
        write!(f, ")")
    }
}
