//! # folio-common
//!
//! Common types, errors, and constants for Folio.
//!
//! This crate provides the foundational pieces shared by the store and the
//! HTTP service:
//!
//! - **Types**: Transaction identifiers (`TxnId`)
//! - **Errors**: Unified error handling with `FolioError`
//! - **Constants**: Table and index names of the built-in schema, server defaults
//!
//! ## Example
//!
//! ```rust
//! use folio_common::error::{FolioError, FolioResult};
//!
//! fn lookup(table: &str) -> FolioResult<()> {
//!     Err(FolioError::TableNotFound { table: table.to_string() })
//! }
//!
//! assert!(lookup("books").is_err());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod constants;
pub mod error;
pub mod types;

// Re-export commonly used items at the crate root
pub use constants::*;
pub use error::{ErrorCode, FolioError, FolioResult};
pub use types::{TxnId, TxnIdAllocator};
