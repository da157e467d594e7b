//! Index keys, extraction rules, and per-index storage.
//!
//! - [`IndexKey`]: order-preserving byte encoding of index values
//! - [`Indexer`]: derives keys from a record field and from query arguments
//! - [`IndexTree`]: sorted `(key, primary key)` entries of one index

mod indexer;
mod key;
mod tree;

pub use indexer::{IndexValue, Indexer};
pub use key::IndexKey;
pub use tree::{IndexEntry, IndexTree};
