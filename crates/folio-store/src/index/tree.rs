//! Ordered storage for one index.
//!
//! Every index, unique or not, is a sorted set of `(key, primary key)`
//! entries. Appending the primary key makes each entry distinct, so a
//! non-unique index files many records under one key and a multi-valued
//! extraction files one record under many keys without special cases.
//! Uniqueness is a check performed before insertion, not a property of the
//! structure.

use std::collections::btree_set::{self, BTreeSet};
use std::ops::Bound;

use super::key::IndexKey;

/// One index entry.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IndexEntry {
    /// The extracted index key.
    pub key: IndexKey,
    /// Primary key of the record filed under `key`.
    pub pk: IndexKey,
}

impl IndexEntry {
    /// Creates an entry.
    pub fn new(key: IndexKey, pk: IndexKey) -> Self {
        Self { key, pk }
    }

    /// The smallest entry with the given key; a scan starting here visits
    /// every entry for `key` first.
    pub fn lower_bound(key: IndexKey) -> Self {
        Self {
            key,
            pk: IndexKey::EMPTY,
        }
    }
}

/// Sorted entries of a single index.
#[derive(Debug, Clone, Default)]
pub struct IndexTree {
    entries: BTreeSet<IndexEntry>,
}

impl IndexTree {
    /// Creates an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries (not records: a multi-valued index may file one
    /// record several times).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the tree holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Adds an entry.
    pub fn insert(&mut self, key: IndexKey, pk: IndexKey) {
        self.entries.insert(IndexEntry::new(key, pk));
    }

    /// Removes an entry, returning whether it was present.
    pub fn remove(&mut self, key: IndexKey, pk: IndexKey) -> bool {
        self.entries.remove(&IndexEntry::new(key, pk))
    }

    /// Returns the primary keys filed under `key`, in order.
    pub fn holders<'a>(&'a self, key: &'a IndexKey) -> impl Iterator<Item = &'a IndexKey> + 'a {
        self.entries
            .range(IndexEntry::lower_bound(key.clone())..)
            .take_while(move |e| &e.key == key)
            .map(|e| &e.pk)
    }

    /// Returns true if some record other than `pk` is filed under `key`.
    pub fn is_taken_by_other(&self, key: &IndexKey, pk: &IndexKey) -> bool {
        self.holders(key).any(|holder| holder != pk)
    }

    /// Iterates entries from `start` onwards, in key order.
    pub fn range_from(&self, start: Bound<IndexEntry>) -> btree_set::Range<'_, IndexEntry> {
        self.entries.range((start, Bound::Unbounded))
    }
}
