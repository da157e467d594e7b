//! The store: schema, committed state and the writer lock.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use folio_common::{FolioError, FolioResult, TxnIdAllocator};
use parking_lot::{Mutex, RwLock};
use tracing::debug;

use crate::schema::DbSchema;
use crate::snapshot::Snapshot;
use crate::txn::Transaction;

/// In-memory, schema-indexed, transactional record store.
///
/// Any number of read transactions run in parallel with each other and with
/// at most one write transaction. Readers never block; opening a write
/// transaction waits until the previous one commits or aborts.
///
/// # Example
///
/// ```rust
/// use folio_store::{library_schema, Author, IndexQuery, Store};
///
/// let store = Store::new(library_schema().unwrap());
///
/// let mut txn = store.write_txn();
/// txn.insert("author", Author::new(1, "Ada", ["math"])).unwrap();
/// txn.commit().unwrap();
///
/// let txn = store.read_txn();
/// let found: Vec<_> = txn
///     .get("author", "subjects", IndexQuery::exact("math"))
///     .unwrap()
///     .collect();
/// assert_eq!(found.len(), 1);
/// ```
#[derive(Debug)]
pub struct Store {
    schema: DbSchema,
    committed: RwLock<Arc<Snapshot>>,
    writer: Mutex<()>,
    txn_ids: TxnIdAllocator,
    counters: Counters,
}

impl Store {
    /// Creates a store with every table of `schema`, empty.
    pub fn new(schema: DbSchema) -> Self {
        let initial = Snapshot::empty(&schema);
        debug!(tables = schema.len(), "store created");
        Self {
            schema,
            committed: RwLock::new(Arc::new(initial)),
            writer: Mutex::new(()),
            txn_ids: TxnIdAllocator::new(),
            counters: Counters::default(),
        }
    }

    /// The schema this store was built with.
    pub fn schema(&self) -> &DbSchema {
        &self.schema
    }

    /// Opens a transaction; `writable` selects [`write_txn`](Self::write_txn)
    /// over [`read_txn`](Self::read_txn).
    pub fn txn(&self, writable: bool) -> Transaction<'_> {
        if writable {
            self.write_txn()
        } else {
            self.read_txn()
        }
    }

    /// Opens a read transaction over the latest committed state.
    pub fn read_txn(&self) -> Transaction<'_> {
        let id = self.txn_ids.allocate();
        self.counters.read_txns.fetch_add(1, Ordering::Relaxed);
        Transaction::read(self, id, self.current())
    }

    /// Opens a write transaction, waiting for the writer lock.
    pub fn write_txn(&self) -> Transaction<'_> {
        let guard = self.writer.lock();
        self.begin_write(guard)
    }

    /// Opens a write transaction, giving up after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`FolioError::Timeout`] if another write transaction still
    /// holds the lock when the deadline passes.
    pub fn write_txn_timeout(&self, timeout: Duration) -> FolioResult<Transaction<'_>> {
        let guard = self
            .writer
            .try_lock_for(timeout)
            .ok_or_else(|| FolioError::Timeout {
                duration_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
            })?;
        Ok(self.begin_write(guard))
    }

    /// Returns a copy of the lifetime counters.
    pub fn stats(&self) -> StoreStats {
        self.counters.snapshot()
    }

    /// Version of the latest committed state.
    pub fn version(&self) -> u64 {
        self.committed.read().version()
    }

    fn begin_write<'a>(&'a self, guard: parking_lot::MutexGuard<'a, ()>) -> Transaction<'a> {
        // Read the committed state only after the lock is held, so the
        // transaction starts from the previous writer's result.
        let id = self.txn_ids.allocate();
        self.counters.write_txns.fetch_add(1, Ordering::Relaxed);
        Transaction::write(self, id, self.current(), guard)
    }

    fn current(&self) -> Arc<Snapshot> {
        Arc::clone(&self.committed.read())
    }

    /// Installs `staged` as the committed state. Caller holds the writer lock.
    pub(crate) fn publish(&self, staged: Snapshot) -> u64 {
        let next = Arc::new(staged.into_next());
        let version = next.version();
        *self.committed.write() = next;
        version
    }

    pub(crate) fn counters(&self) -> &Counters {
        &self.counters
    }
}

/// Lifetime counters of a [`Store`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreStats {
    /// Write transactions committed.
    pub commits: u64,
    /// Write transactions aborted or dropped uncommitted.
    pub aborts: u64,
    /// Read transactions opened.
    pub read_txns: u64,
    /// Write transactions opened.
    pub write_txns: u64,
}

#[derive(Debug, Default)]
pub(crate) struct Counters {
    commits: AtomicU64,
    aborts: AtomicU64,
    read_txns: AtomicU64,
    write_txns: AtomicU64,
}

impl Counters {
    pub(crate) fn record_commit(&self) {
        self.commits.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_abort(&self) {
        self.aborts.fetch_add(1, Ordering::Relaxed);
    }

    fn snapshot(&self) -> StoreStats {
        StoreStats {
            commits: self.commits.load(Ordering::Relaxed),
            aborts: self.aborts.load(Ordering::Relaxed),
            read_txns: self.read_txns.load(Ordering::Relaxed),
            write_txns: self.write_txns.load(Ordering::Relaxed),
        }
    }
}
