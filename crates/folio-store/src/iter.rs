//! Index queries and result iteration.

use std::collections::btree_set;
use std::collections::HashSet;
use std::iter::FusedIterator;
use std::ops::Bound;
use std::sync::Arc;

use folio_common::{FolioError, FolioResult};

use crate::index::{IndexEntry, IndexKey, IndexValue};
use crate::record::Record;
use crate::schema::{IndexSchema, TableSchema};
use crate::table::TableData;

/// Which entries of an index a scan visits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexQuery {
    /// Every entry, in key order.
    All,
    /// Entries whose key equals the argument.
    Eq(IndexValue),
    /// Entries whose key starts with the argument. String indexes only.
    Prefix(String),
    /// Entries whose key is greater than or equal to the argument.
    From(IndexValue),
}

impl IndexQuery {
    /// Exact-match query.
    pub fn exact(value: impl Into<IndexValue>) -> Self {
        IndexQuery::Eq(value.into())
    }

    /// Prefix query.
    pub fn prefix(value: impl Into<String>) -> Self {
        IndexQuery::Prefix(value.into())
    }

    /// Lower-bound (inclusive) query.
    pub fn starting_at(value: impl Into<IndexValue>) -> Self {
        IndexQuery::From(value.into())
    }
}

/// Where a scan ends.
#[derive(Debug, Clone)]
enum Stop {
    Never,
    AfterKey(IndexKey),
    AfterPrefix(IndexKey),
}

impl Stop {
    fn admits(&self, key: &IndexKey) -> bool {
        match self {
            Stop::Never => true,
            Stop::AfterKey(k) => key == k,
            Stop::AfterPrefix(p) => key.starts_with(p),
        }
    }
}

/// Lazy, ordered iterator over the records an index query matches.
///
/// Borrows the transaction that created it, so it cannot outlive a commit
/// or abort. Each record is yielded once, at the lowest key it is filed
/// under in the scanned range.
pub struct ResultIter<'a> {
    entries: btree_set::Range<'a, IndexEntry>,
    rows: &'a TableData,
    stop: Stop,
    seen: Option<HashSet<&'a IndexKey>>,
    done: bool,
}

impl<'a> ResultIter<'a> {
    pub(crate) fn new(
        table: &TableSchema,
        rows: &'a TableData,
        index: &IndexSchema,
        query: &IndexQuery,
    ) -> FolioResult<Self> {
        let tree = rows
            .index(index.name())
            .ok_or_else(|| FolioError::index_not_found(table.name(), index.name()))?;
        let indexer = index.indexer();

        let (start, stop) = match query {
            IndexQuery::All => (Bound::Unbounded, Stop::Never),
            IndexQuery::Eq(arg) => {
                let key = indexer.key_for_arg(index.name(), arg)?;
                (
                    Bound::Included(IndexEntry::lower_bound(key.clone())),
                    Stop::AfterKey(key),
                )
            }
            IndexQuery::Prefix(arg) => {
                let prefix = indexer.prefix_for_arg(index.name(), &IndexValue::Str(arg.clone()))?;
                (
                    Bound::Included(IndexEntry::lower_bound(prefix.clone())),
                    Stop::AfterPrefix(prefix),
                )
            }
            IndexQuery::From(arg) => {
                let key = indexer.key_for_arg(index.name(), arg)?;
                (Bound::Included(IndexEntry::lower_bound(key)), Stop::Never)
            }
        };

        // A single exact key never repeats a primary key.
        let dedupe = indexer.is_multi_valued() && !matches!(stop, Stop::AfterKey(_));

        Ok(Self {
            entries: tree.range_from(start),
            rows,
            stop,
            seen: dedupe.then(HashSet::new),
            done: false,
        })
    }
}

impl Iterator for ResultIter<'_> {
    type Item = Arc<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.done {
            let Some(entry) = self.entries.next() else {
                self.done = true;
                break;
            };
            if !self.stop.admits(&entry.key) {
                self.done = true;
                break;
            }
            if let Some(seen) = &mut self.seen {
                if !seen.insert(&entry.pk) {
                    continue;
                }
            }
            if let Some(record) = self.rows.row(&entry.pk) {
                return Some(Arc::clone(record));
            }
        }
        None
    }
}

impl FusedIterator for ResultIter<'_> {}

impl std::fmt::Debug for ResultIter<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResultIter")
            .field("stop", &self.stop)
            .field("done", &self.done)
            .finish_non_exhaustive()
    }
}
