//! Error handling for Folio.
//!
//! This module provides a unified error type and result alias used
//! by the store and the HTTP service.

mod store;

pub use store::{ErrorCode, FolioError};

/// Result type alias for Folio operations.
pub type FolioResult<T> = std::result::Result<T, FolioError>;
