//! Store error types.
//!
//! Provides the error taxonomy for schema construction, indexed access and
//! transaction lifecycle.

use std::fmt;
use thiserror::Error;

use crate::types::TxnId;

/// Error codes for categorizing errors.
///
/// These codes can be used for programmatic error handling and
/// are stable across versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum ErrorCode {
    // General errors (0x0000 - 0x00FF)
    /// Internal error (bug).
    Internal = 0x0001,
    /// Operation timed out.
    Timeout = 0x0004,

    // Schema errors (0x0100 - 0x01FF)
    /// Table not found.
    TableNotFound = 0x0100,
    /// Index not found.
    IndexNotFound = 0x0101,
    /// Record or argument type does not match the schema.
    TypeMismatch = 0x0102,
    /// Schema definition is invalid.
    InvalidSchema = 0x0103,

    // Constraint errors (0x0200 - 0x02FF)
    /// Unique index key already taken by another record.
    UniqueViolation = 0x0200,
    /// Record produced no key for an index that requires one.
    MissingIndexValue = 0x0201,

    // Transaction errors (0x0300 - 0x03FF)
    /// Transaction already committed or aborted.
    TransactionClosed = 0x0300,
    /// Write attempted through a read transaction.
    ReadOnlyTransaction = 0x0301,

    // Configuration errors (0x0400 - 0x04FF)
    /// Invalid configuration.
    InvalidConfig = 0x0400,
}

impl ErrorCode {
    /// Returns the numeric code.
    #[inline]
    #[must_use]
    pub const fn as_u16(self) -> u16 {
        self as u16
    }

    /// Returns the error category name.
    #[must_use]
    pub const fn category(&self) -> &'static str {
        match (*self as u16) >> 8 {
            0x00 => "General",
            0x01 => "Schema",
            0x02 => "Constraint",
            0x03 => "Transaction",
            0x04 => "Config",
            _ => "Unknown",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// The main error type for Folio.
///
/// Every store operation reports failures through this enum. Each variant
/// carries the names needed to locate the offending table, index or
/// transaction.
///
/// # Example
///
/// ```rust
/// use folio_common::error::{ErrorCode, FolioError};
///
/// let err = FolioError::IndexNotFound {
///     table: "author".to_string(),
///     index: "email".to_string(),
/// };
/// assert_eq!(err.code(), ErrorCode::IndexNotFound);
/// assert!(err.is_schema_error());
/// ```
#[derive(Debug, Error)]
pub enum FolioError {
    // ==========================================================================
    // General Errors
    // ==========================================================================
    /// Internal error - this indicates a bug.
    #[error("internal error: {message}")]
    Internal {
        /// Error message.
        message: String,
    },

    /// Waiting for the write lock exceeded the caller's deadline.
    #[error("timed out after {duration_ms}ms waiting for the write lock")]
    Timeout {
        /// Deadline in milliseconds.
        duration_ms: u64,
    },

    // ==========================================================================
    // Schema Errors (runtime lookups)
    // ==========================================================================
    /// Table not found.
    #[error("table '{table}' not found")]
    TableNotFound {
        /// The missing table.
        table: String,
    },

    /// Index not found.
    #[error("index '{index}' not found in table '{table}'")]
    IndexNotFound {
        /// The table that was searched.
        table: String,
        /// The missing index.
        index: String,
    },

    /// Record kind does not match the table's declared kind.
    #[error("table '{table}' stores {expected} records, got {actual}")]
    RecordKindMismatch {
        /// The target table.
        table: String,
        /// Kind declared by the schema.
        expected: String,
        /// Kind of the supplied record.
        actual: String,
    },

    /// Query argument does not match the index key type.
    #[error("index '{index}' expects a {expected} argument, got {actual}")]
    ArgumentTypeMismatch {
        /// The queried index.
        index: String,
        /// Expected argument type.
        expected: String,
        /// Supplied argument type.
        actual: String,
    },

    // ==========================================================================
    // Schema Errors (construction)
    // ==========================================================================
    /// Two tables share a name.
    #[error("table '{table}' is defined more than once")]
    DuplicateTable {
        /// The duplicated table name.
        table: String,
    },

    /// Two indexes of one table share a name.
    #[error("index '{index}' is defined more than once in table '{table}'")]
    DuplicateIndex {
        /// The table.
        table: String,
        /// The duplicated index name.
        index: String,
    },

    /// Index references a field the record kind does not have.
    #[error("index '{index}' of table '{table}' references unknown field '{field}'")]
    UnknownField {
        /// The table.
        table: String,
        /// The index.
        index: String,
        /// The missing field.
        field: String,
    },

    /// Index extraction rule does not fit the field's type.
    #[error("index '{index}' of table '{table}' needs a {expected} field, '{field}' is {actual}")]
    FieldTypeMismatch {
        /// The table.
        table: String,
        /// The index.
        index: String,
        /// The referenced field.
        field: String,
        /// Field type the extraction rule needs.
        expected: String,
        /// Actual field type.
        actual: String,
    },

    /// Table has no usable primary index: an index named `id` that is
    /// unique and does not allow missing values.
    #[error("table '{table}' must have a unique 'id' index that requires a value")]
    MissingPrimaryIndex {
        /// The table.
        table: String,
    },

    // ==========================================================================
    // Constraint Errors
    // ==========================================================================
    /// Unique index key already held by a different record.
    #[error("unique constraint violation on index '{index}' of table '{table}'")]
    UniqueConstraintViolation {
        /// The table.
        table: String,
        /// The unique index.
        index: String,
    },

    /// Record yields no key for an index that does not allow missing values.
    #[error("missing value for index '{index}' of table '{table}'")]
    MissingIndexValue {
        /// The table.
        table: String,
        /// The index.
        index: String,
    },

    // ==========================================================================
    // Transaction Errors
    // ==========================================================================
    /// Operation attempted on a committed or aborted transaction.
    #[error("transaction {txn_id} is closed")]
    TransactionClosed {
        /// The closed transaction.
        txn_id: TxnId,
    },

    /// Write attempted through a read transaction.
    #[error("transaction {txn_id} is read-only")]
    ReadOnlyTransaction {
        /// The read transaction.
        txn_id: TxnId,
    },

    // ==========================================================================
    // Configuration Errors
    // ==========================================================================
    /// Invalid configuration.
    #[error("invalid configuration: {message}")]
    InvalidConfig {
        /// Error message.
        message: String,
    },
}

impl FolioError {
    /// Returns the error code for this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Internal { .. } => ErrorCode::Internal,
            Self::Timeout { .. } => ErrorCode::Timeout,
            Self::TableNotFound { .. } => ErrorCode::TableNotFound,
            Self::IndexNotFound { .. } => ErrorCode::IndexNotFound,
            Self::RecordKindMismatch { .. } | Self::ArgumentTypeMismatch { .. } => {
                ErrorCode::TypeMismatch
            }
            Self::DuplicateTable { .. }
            | Self::DuplicateIndex { .. }
            | Self::UnknownField { .. }
            | Self::FieldTypeMismatch { .. }
            | Self::MissingPrimaryIndex { .. } => ErrorCode::InvalidSchema,
            Self::UniqueConstraintViolation { .. } => ErrorCode::UniqueViolation,
            Self::MissingIndexValue { .. } => ErrorCode::MissingIndexValue,
            Self::TransactionClosed { .. } => ErrorCode::TransactionClosed,
            Self::ReadOnlyTransaction { .. } => ErrorCode::ReadOnlyTransaction,
            Self::InvalidConfig { .. } => ErrorCode::InvalidConfig,
        }
    }

    /// Returns true if this error is retryable.
    ///
    /// Only an expired write-lock deadline qualifies; everything else needs
    /// the caller to change what it asks for.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    /// Returns true for schema lookup and construction errors.
    #[must_use]
    pub const fn is_schema_error(&self) -> bool {
        matches!(
            self.code(),
            ErrorCode::TableNotFound
                | ErrorCode::IndexNotFound
                | ErrorCode::TypeMismatch
                | ErrorCode::InvalidSchema
        )
    }

    /// Returns true for misuse of a transaction handle.
    #[must_use]
    pub const fn is_transaction_state_error(&self) -> bool {
        matches!(
            self,
            Self::TransactionClosed { .. } | Self::ReadOnlyTransaction { .. }
        )
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Creates an invalid configuration error.
    #[must_use]
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Creates a table-not-found error.
    #[must_use]
    pub fn table_not_found(table: impl Into<String>) -> Self {
        Self::TableNotFound {
            table: table.into(),
        }
    }

    /// Creates an index-not-found error.
    #[must_use]
    pub fn index_not_found(table: impl Into<String>, index: impl Into<String>) -> Self {
        Self::IndexNotFound {
            table: table.into(),
            index: index.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code() {
        let err = FolioError::table_not_found("books");
        assert_eq!(err.code(), ErrorCode::TableNotFound);
        assert_eq!(err.code().category(), "Schema");

        let err = FolioError::UniqueConstraintViolation {
            table: "author".into(),
            index: "id".into(),
        };
        assert_eq!(err.code().category(), "Constraint");
        assert_eq!(err.code().as_u16(), 0x0200);
    }

    #[test]
    fn test_error_display() {
        let err = FolioError::index_not_found("author", "email");
        assert_eq!(
            err.to_string(),
            "index 'email' not found in table 'author'"
        );

        let err = FolioError::TransactionClosed {
            txn_id: TxnId::new(7),
        };
        assert_eq!(err.to_string(), "transaction 7 is closed");
    }

    #[test]
    fn test_retryable() {
        assert!(FolioError::Timeout { duration_ms: 10 }.is_retryable());
        assert!(!FolioError::table_not_found("x").is_retryable());
        assert!(!FolioError::UniqueConstraintViolation {
            table: "author".into(),
            index: "id".into(),
        }
        .is_retryable());
    }

    #[test]
    fn test_classification() {
        assert!(FolioError::index_not_found("a", "b").is_schema_error());
        assert!(FolioError::DuplicateIndex {
            table: "a".into(),
            index: "b".into(),
        }
        .is_schema_error());
        assert!(!FolioError::internal("boom").is_schema_error());

        let closed = FolioError::TransactionClosed {
            txn_id: TxnId::new(1),
        };
        assert!(closed.is_transaction_state_error());
        assert!(!closed.is_schema_error());
    }
}
