//! Transactions.
//!
//! A [`Transaction`] reads from the snapshot that was committed when it
//! opened. A write transaction additionally holds the store's writer lock
//! for its whole life and stages inserts in a private copy of that
//! snapshot, which `commit` publishes in one step.
//!
//! ```text
//!   Active ──commit──► Committed
//!     │
//!     └──abort/drop──► Aborted
//! ```

use std::sync::Arc;

use folio_common::{FolioError, FolioResult, TxnId};
use parking_lot::MutexGuard;
use tracing::{debug, trace};

use crate::iter::{IndexQuery, ResultIter};
use crate::record::Record;
use crate::snapshot::Snapshot;
use crate::store::Store;

/// Lifecycle state of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxnState {
    /// Open for reads (and writes, if writable).
    Active,
    /// Committed; no further use.
    Committed,
    /// Aborted or dropped; no further use.
    Aborted,
}

impl TxnState {
    /// Returns true once the transaction has been committed or aborted.
    pub fn is_closed(self) -> bool {
        !matches!(self, TxnState::Active)
    }
}

/// A read or write transaction against a [`Store`].
pub struct Transaction<'db> {
    id: TxnId,
    store: &'db Store,
    state: TxnState,
    writable: bool,
    /// Committed state as of open.
    base: Arc<Snapshot>,
    /// Staged state; created on the first insert.
    pending: Option<Snapshot>,
    /// Set once an insert has succeeded.
    dirty: bool,
    /// Held by write transactions until commit or abort.
    writer: Option<MutexGuard<'db, ()>>,
}

impl<'db> Transaction<'db> {
    pub(crate) fn read(store: &'db Store, id: TxnId, base: Arc<Snapshot>) -> Self {
        Self {
            id,
            store,
            state: TxnState::Active,
            writable: false,
            base,
            pending: None,
            dirty: false,
            writer: None,
        }
    }

    pub(crate) fn write(
        store: &'db Store,
        id: TxnId,
        base: Arc<Snapshot>,
        writer: MutexGuard<'db, ()>,
    ) -> Self {
        Self {
            id,
            store,
            state: TxnState::Active,
            writable: true,
            base,
            pending: None,
            dirty: false,
            writer: Some(writer),
        }
    }

    /// Transaction id.
    pub fn id(&self) -> TxnId {
        self.id
    }

    /// Returns true for write transactions.
    pub fn is_writable(&self) -> bool {
        self.writable
    }

    /// Current lifecycle state.
    pub fn state(&self) -> TxnState {
        self.state
    }

    /// Version of the committed state this transaction started from.
    pub fn snapshot_version(&self) -> u64 {
        self.base.version()
    }

    /// Inserts a record, replacing any record with the same primary key.
    ///
    /// The change is visible to this transaction immediately and to
    /// everyone else after [`commit`](Self::commit). A failed insert leaves
    /// the staged state as it was.
    pub fn insert(&mut self, table: &str, record: impl Into<Record>) -> FolioResult<()> {
        self.ensure_active()?;
        if !self.writable {
            return Err(FolioError::ReadOnlyTransaction { txn_id: self.id });
        }

        let schema = self.store.schema().require_table(table)?;
        let record = record.into();
        let id = record.id();

        let pending = self.pending.get_or_insert_with(|| (*self.base).clone());
        let replaced = pending.table_mut(table)?.insert(schema, record)?;
        self.dirty = true;

        trace!(
            txn_id = %self.id,
            table,
            id,
            replaced = replaced.is_some(),
            "record staged"
        );
        Ok(())
    }

    /// Scans `index` of `table`, returning the matching records in key
    /// order.
    pub fn get(&self, table: &str, index: &str, query: IndexQuery) -> FolioResult<ResultIter<'_>> {
        self.ensure_active()?;
        let table_schema = self.store.schema().require_table(table)?;
        let index_schema = table_schema.require_index(index)?;
        let rows = self.view().table(table)?;
        ResultIter::new(table_schema, rows, index_schema, &query)
    }

    /// Returns the first record a scan would yield.
    pub fn first(
        &self,
        table: &str,
        index: &str,
        query: IndexQuery,
    ) -> FolioResult<Option<Arc<Record>>> {
        Ok(self.get(table, index, query)?.next())
    }

    /// Number of records visible in `table`.
    pub fn count(&self, table: &str) -> FolioResult<usize> {
        self.ensure_active()?;
        self.store.schema().require_table(table)?;
        Ok(self.view().table(table)?.len())
    }

    /// Publishes all staged inserts and closes the transaction.
    ///
    /// On a read transaction this only closes it.
    pub fn commit(&mut self) -> FolioResult<()> {
        self.ensure_active()?;

        if self.writable {
            let published = match self.pending.take() {
                Some(pending) if self.dirty => Some(self.store.publish(pending)),
                _ => None,
            };
            self.writer = None;
            self.store.counters().record_commit();
            debug!(
                txn_id = %self.id,
                version = published.unwrap_or_else(|| self.base.version()),
                "transaction committed"
            );
        }

        self.state = TxnState::Committed;
        Ok(())
    }

    /// Discards staged inserts and closes the transaction.
    ///
    /// Safe to call at any time; does nothing once closed.
    pub fn abort(&mut self) {
        if self.state.is_closed() {
            return;
        }

        self.pending = None;
        self.writer = None;
        self.state = TxnState::Aborted;
        if self.writable {
            self.store.counters().record_abort();
            debug!(txn_id = %self.id, "transaction aborted");
        }
    }

    fn ensure_active(&self) -> FolioResult<()> {
        if self.state.is_closed() {
            return Err(FolioError::TransactionClosed { txn_id: self.id });
        }
        Ok(())
    }

    fn view(&self) -> &Snapshot {
        self.pending.as_ref().unwrap_or(&*self.base)
    }
}

impl Drop for Transaction<'_> {
    fn drop(&mut self) {
        self.abort();
    }
}

impl std::fmt::Debug for Transaction<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transaction")
            .field("id", &self.id)
            .field("state", &self.state)
            .field("writable", &self.writable)
            .field("snapshot_version", &self.base.version())
            .field("dirty", &self.dirty)
            .finish_non_exhaustive()
    }
}
