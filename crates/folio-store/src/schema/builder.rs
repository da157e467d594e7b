//! Validating schema construction.

use std::collections::BTreeMap;

use folio_common::{FolioError, FolioResult, PRIMARY_INDEX};
use tracing::debug;

use crate::index::Indexer;
use crate::record::RecordKind;

use super::{DbSchema, IndexSchema, TableSchema};

/// Collects index definitions for one table.
#[derive(Debug, Clone)]
pub struct TableBuilder {
    name: String,
    kind: RecordKind,
    indexes: Vec<IndexSchema>,
}

impl TableBuilder {
    /// Starts a table of the given record kind.
    pub fn new(name: impl Into<String>, kind: RecordKind) -> Self {
        Self {
            name: name.into(),
            kind,
            indexes: Vec::new(),
        }
    }

    /// Adds an index.
    #[must_use]
    pub fn index(mut self, index: IndexSchema) -> Self {
        self.indexes.push(index);
        self
    }

    fn build(mut self) -> FolioResult<TableSchema> {
        let mut indexes = BTreeMap::new();

        for index in std::mem::take(&mut self.indexes) {
            self.check_field(&index)?;
            let name = index.name().to_string();
            if indexes.insert(name.clone(), index).is_some() {
                return Err(FolioError::DuplicateIndex {
                    table: self.name,
                    index: name,
                });
            }
        }

        let primary_ok = indexes.get(PRIMARY_INDEX).is_some_and(|id: &IndexSchema| {
            id.is_unique() && !id.allows_missing() && matches!(id.indexer(), Indexer::Uint { .. })
        });
        if !primary_ok {
            return Err(FolioError::MissingPrimaryIndex { table: self.name });
        }

        Ok(TableSchema {
            name: self.name,
            kind: self.kind,
            indexes,
        })
    }

    fn check_field(&self, index: &IndexSchema) -> FolioResult<()> {
        let field = index.indexer().field();
        let def = self.kind.field(field).ok_or_else(|| FolioError::UnknownField {
            table: self.name.clone(),
            index: index.name().to_string(),
            field: field.to_string(),
        })?;

        let expected = index.indexer().field_type();
        if def.ty != expected {
            return Err(FolioError::FieldTypeMismatch {
                table: self.name.clone(),
                index: index.name().to_string(),
                field: field.to_string(),
                expected: expected.to_string(),
                actual: def.ty.to_string(),
            });
        }
        Ok(())
    }
}

/// Collects table definitions and validates them into a [`DbSchema`].
#[derive(Debug, Clone, Default)]
pub struct SchemaBuilder {
    tables: Vec<TableBuilder>,
}

impl SchemaBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a table.
    #[must_use]
    pub fn table(mut self, table: TableBuilder) -> Self {
        self.tables.push(table);
        self
    }

    /// Validates all definitions and produces the schema.
    pub fn build(self) -> FolioResult<DbSchema> {
        let mut tables = BTreeMap::new();

        for builder in self.tables {
            let table = builder.build()?;
            let name = table.name().to_string();
            if tables.insert(name.clone(), table).is_some() {
                return Err(FolioError::DuplicateTable { table: name });
            }
        }

        debug!(tables = tables.len(), "schema built");
        Ok(DbSchema { tables })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_common::ErrorCode;

    fn id_index() -> IndexSchema {
        IndexSchema::new(PRIMARY_INDEX, Indexer::uint("id")).unique(true)
    }

    #[test]
    fn test_duplicate_index_rejected() {
        let err = SchemaBuilder::new()
            .table(
                TableBuilder::new("author", RecordKind::Author)
                    .index(id_index())
                    .index(IndexSchema::new("by_name", Indexer::string("name")))
                    .index(IndexSchema::new("by_name", Indexer::string("name"))),
            )
            .build()
            .unwrap_err();

        assert!(matches!(err, FolioError::DuplicateIndex { ref index, .. } if index == "by_name"));
        assert_eq!(err.code(), ErrorCode::InvalidSchema);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = SchemaBuilder::new()
            .table(
                TableBuilder::new("author", RecordKind::Author)
                    .index(id_index())
                    .index(IndexSchema::new("email", Indexer::string("email"))),
            )
            .build()
            .unwrap_err();

        assert!(matches!(err, FolioError::UnknownField { ref field, .. } if field == "email"));
    }

    #[test]
    fn test_field_type_mismatch_rejected() {
        let err = SchemaBuilder::new()
            .table(
                TableBuilder::new("author", RecordKind::Author)
                    .index(id_index())
                    .index(IndexSchema::new("subjects", Indexer::string("subjects"))),
            )
            .build()
            .unwrap_err();

        assert!(matches!(err, FolioError::FieldTypeMismatch { .. }));
    }

    #[test]
    fn test_primary_index_required() {
        let missing = SchemaBuilder::new()
            .table(
                TableBuilder::new("article", RecordKind::Article)
                    .index(IndexSchema::new("title", Indexer::string("title"))),
            )
            .build();
        assert!(matches!(missing, Err(FolioError::MissingPrimaryIndex { .. })));

        let not_unique = SchemaBuilder::new()
            .table(
                TableBuilder::new("article", RecordKind::Article)
                    .index(IndexSchema::new(PRIMARY_INDEX, Indexer::uint("id"))),
            )
            .build();
        assert!(matches!(not_unique, Err(FolioError::MissingPrimaryIndex { .. })));

        let optional = SchemaBuilder::new()
            .table(
                TableBuilder::new("article", RecordKind::Article)
                    .index(id_index().allow_missing(true)),
            )
            .build();
        assert!(matches!(optional, Err(FolioError::MissingPrimaryIndex { .. })));
    }

    #[test]
    fn test_duplicate_table_rejected() {
        let err = SchemaBuilder::new()
            .table(TableBuilder::new("author", RecordKind::Author).index(id_index()))
            .table(TableBuilder::new("author", RecordKind::Author).index(id_index()))
            .build()
            .unwrap_err();
        assert!(matches!(err, FolioError::DuplicateTable { .. }));
    }

    #[test]
    fn test_empty_schema_is_valid() {
        let schema = SchemaBuilder::new().build().unwrap();
        assert!(schema.is_empty());
    }
}
