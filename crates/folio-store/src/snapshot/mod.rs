//! Immutable views of committed state.
//!
//! A [`Snapshot`] maps every table to its data behind an `Arc`. Readers
//! hold an `Arc<Snapshot>` and never see it change. A write transaction
//! clones the snapshot it started from (one `Arc` per table, no record
//! copies) and calls [`Snapshot::table_mut`], which copies a table only
//! the first time the transaction touches it. Tables the transaction never
//! writes stay shared with every reader.
//!
//! The copy is of the whole table: its row map and every index tree.
//! The first insert of a write transaction therefore costs time linear in
//! the size of the table it touches; later inserts into the same table
//! within that transaction reuse the copy and cost only the index updates.

use std::collections::HashMap;
use std::sync::Arc;

use folio_common::{FolioError, FolioResult};

use crate::schema::DbSchema;
use crate::table::TableData;

/// A consistent state of every table.
#[derive(Debug, Clone)]
pub struct Snapshot {
    /// Table data keyed by table name.
    tables: HashMap<String, Arc<TableData>>,
    /// Number of commits that produced this state.
    version: u64,
}

impl Snapshot {
    /// Creates the initial state: every table of `schema`, empty.
    pub fn empty(schema: &DbSchema) -> Self {
        Self {
            tables: schema
                .tables()
                .map(|t| (t.name().to_string(), Arc::new(TableData::new(t))))
                .collect(),
            version: 0,
        }
    }

    /// Returns the commit count this snapshot reflects.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Returns a table's data.
    pub fn table(&self, name: &str) -> FolioResult<&TableData> {
        self.tables
            .get(name)
            .map(AsRef::as_ref)
            .ok_or_else(|| FolioError::table_not_found(name))
    }

    /// Returns a table's data for mutation, copying it if it is still
    /// shared with another snapshot.
    pub fn table_mut(&mut self, name: &str) -> FolioResult<&mut TableData> {
        self.tables
            .get_mut(name)
            .map(Arc::make_mut)
            .ok_or_else(|| FolioError::table_not_found(name))
    }

    /// Derives the state to publish on commit.
    pub(crate) fn into_next(mut self) -> Self {
        self.version += 1;
        self
    }

    /// Returns true if both snapshots share the storage of `table`.
    #[cfg(test)]
    pub(crate) fn shares_table(&self, other: &Snapshot, table: &str) -> bool {
        match (self.tables.get(table), other.tables.get(table)) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}
