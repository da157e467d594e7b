//! # folio-store
//!
//! In-memory, schema-indexed, transactional record store for Folio.
//!
//! This crate implements:
//! - Record types (`Author`, `Article`) and their tagged union `Record`
//! - Schema definitions with validation at construction
//! - Order-preserving index keys and per-index sorted entry sets
//! - Copy-on-write snapshots giving readers a fixed view of committed state
//! - Transactions: parallel readers, one writer at a time, atomic commit
//!
//! ```text
//!   Store ── RwLock<Arc<Snapshot>> ──► { table ─► Arc<TableData> }
//!     │                                        ├── rows: pk ─► Arc<Record>
//!     └── Mutex<()> (writer lock)              └── indexes: name ─► IndexTree
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Index keys, extraction rules and entry trees
pub mod index;

/// Index queries and result iteration
pub mod iter;

/// Record types
pub mod record;

/// Table and index definitions
pub mod schema;

/// Immutable committed state
pub mod snapshot;

/// Store handle
pub mod store;

/// Per-table rows and indexes
pub mod table;

/// Transactions
pub mod txn;

pub use index::{IndexKey, IndexValue, Indexer};
pub use iter::{IndexQuery, ResultIter};
pub use record::{Article, Author, Record, RecordKind};
pub use schema::{library_schema, DbSchema, IndexSchema, SchemaBuilder, TableBuilder, TableSchema};
pub use store::{Store, StoreStats};
pub use txn::{Transaction, TxnState};
