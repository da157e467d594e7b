//! Type definitions for Folio.

mod ids;

pub use ids::{TxnId, TxnIdAllocator};
