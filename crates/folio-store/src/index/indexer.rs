//! Key extraction rules.
//!
//! An [`Indexer`] turns a record into the set of keys it is filed under in
//! one index, and turns a query argument into the key to search for.

use std::collections::BTreeSet;
use std::fmt;

use folio_common::{FolioError, FolioResult};

use crate::record::{FieldType, FieldValue, Record};

use super::key::IndexKey;

/// A query argument for an index lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexValue {
    /// Unsigned integer argument.
    Uint(u64),
    /// String argument.
    Str(String),
}

impl IndexValue {
    fn type_name(&self) -> &'static str {
        match self {
            IndexValue::Uint(_) => FieldType::Uint.name(),
            IndexValue::Str(_) => FieldType::String.name(),
        }
    }
}

impl fmt::Display for IndexValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexValue::Uint(v) => write!(f, "{}", v),
            IndexValue::Str(s) => write!(f, "{:?}", s),
        }
    }
}

impl From<u64> for IndexValue {
    fn from(v: u64) -> Self {
        IndexValue::Uint(v)
    }
}

impl From<&str> for IndexValue {
    fn from(v: &str) -> Self {
        IndexValue::Str(v.to_string())
    }
}

impl From<String> for IndexValue {
    fn from(v: String) -> Self {
        IndexValue::Str(v)
    }
}

/// How an index derives keys from a record field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Indexer {
    /// One key from an unsigned integer field.
    Uint {
        /// Source field.
        field: String,
    },
    /// One key from a string field. Empty strings yield no key.
    String {
        /// Source field.
        field: String,
        /// Fold keys and arguments to lowercase.
        lowercase: bool,
    },
    /// One key per element of a string-list field. Empty elements are
    /// skipped and repeated elements collapse into one key.
    StringList {
        /// Source field.
        field: String,
        /// Fold keys and arguments to lowercase.
        lowercase: bool,
    },
}

impl Indexer {
    /// Unsigned integer field indexer.
    pub fn uint(field: impl Into<String>) -> Self {
        Indexer::Uint {
            field: field.into(),
        }
    }

    /// Case-sensitive string field indexer.
    pub fn string(field: impl Into<String>) -> Self {
        Indexer::String {
            field: field.into(),
            lowercase: false,
        }
    }

    /// Case-sensitive string-list field indexer.
    pub fn string_list(field: impl Into<String>) -> Self {
        Indexer::StringList {
            field: field.into(),
            lowercase: false,
        }
    }

    /// Enables lowercase folding. No effect on uint indexers.
    #[must_use]
    pub fn lowercase(mut self) -> Self {
        match &mut self {
            Indexer::Uint { .. } => {}
            Indexer::String { lowercase, .. } | Indexer::StringList { lowercase, .. } => {
                *lowercase = true;
            }
        }
        self
    }

    /// Returns the source field name.
    pub fn field(&self) -> &str {
        match self {
            Indexer::Uint { field }
            | Indexer::String { field, .. }
            | Indexer::StringList { field, .. } => field,
        }
    }

    /// Returns the field type this indexer reads.
    pub fn field_type(&self) -> FieldType {
        match self {
            Indexer::Uint { .. } => FieldType::Uint,
            Indexer::String { .. } => FieldType::String,
            Indexer::StringList { .. } => FieldType::StringList,
        }
    }

    /// Returns true if one record can yield several keys.
    pub fn is_multi_valued(&self) -> bool {
        matches!(self, Indexer::StringList { .. })
    }

    /// Extracts the keys a record is filed under, in ascending order.
    ///
    /// An empty result means the record has no value for this index.
    pub fn keys_for(&self, record: &Record) -> FolioResult<Vec<IndexKey>> {
        let value = record.field(self.field()).ok_or_else(|| {
            FolioError::internal(format!(
                "{} record has no field '{}'",
                record.kind(),
                self.field()
            ))
        })?;

        match (self, value) {
            (Indexer::Uint { .. }, FieldValue::Uint(v)) => Ok(vec![IndexKey::from_uint(v)]),
            (Indexer::String { lowercase, .. }, FieldValue::Str(s)) => {
                if s.is_empty() {
                    Ok(Vec::new())
                } else {
                    Ok(vec![IndexKey::from_text(s, *lowercase)])
                }
            }
            (Indexer::StringList { lowercase, .. }, FieldValue::StrList(items)) => {
                let keys: BTreeSet<IndexKey> = items
                    .iter()
                    .filter(|s| !s.is_empty())
                    .map(|s| IndexKey::from_text(s, *lowercase))
                    .collect();
                Ok(keys.into_iter().collect())
            }
            (indexer, value) => Err(FolioError::internal(format!(
                "field '{}' is {}, indexer reads {}",
                indexer.field(),
                value.field_type(),
                indexer.field_type()
            ))),
        }
    }

    /// Encodes an exact-match argument.
    pub fn key_for_arg(&self, index: &str, arg: &IndexValue) -> FolioResult<IndexKey> {
        match (self, arg) {
            (Indexer::Uint { .. }, IndexValue::Uint(v)) => Ok(IndexKey::from_uint(*v)),
            (
                Indexer::String { lowercase, .. } | Indexer::StringList { lowercase, .. },
                IndexValue::Str(s),
            ) => Ok(IndexKey::from_text(s, *lowercase)),
            _ => Err(self.arg_mismatch(index, arg)),
        }
    }

    /// Encodes a prefix argument. Only string indexers support prefixes.
    pub fn prefix_for_arg(&self, index: &str, arg: &IndexValue) -> FolioResult<IndexKey> {
        match (self, arg) {
            (
                Indexer::String { lowercase, .. } | Indexer::StringList { lowercase, .. },
                IndexValue::Str(s),
            ) => Ok(IndexKey::prefix(s, *lowercase)),
            _ => Err(self.arg_mismatch(index, arg)),
        }
    }

    fn arg_mismatch(&self, index: &str, arg: &IndexValue) -> FolioError {
        let expected = match self {
            Indexer::Uint { .. } => FieldType::Uint.name(),
            Indexer::String { .. } | Indexer::StringList { .. } => FieldType::String.name(),
        };
        FolioError::ArgumentTypeMismatch {
            index: index.to_string(),
            expected: expected.to_string(),
            actual: arg.type_name().to_string(),
        }
    }
}
