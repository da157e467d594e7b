//! Table and index definitions.
//!
//! A [`DbSchema`] is built once at startup through [`SchemaBuilder`] and is
//! immutable afterwards. The builder validates every definition, so code
//! holding a `DbSchema` can rely on:
//!
//! - table names are unique, and index names are unique within a table
//! - every index reads a field its table's record kind actually has, with
//!   the type its extraction rule expects
//! - every table has a unique `id` index over an integer field that does
//!   not allow missing values (the primary index)

mod builder;

use std::collections::BTreeMap;

use folio_common::{
    FolioError, FolioResult, ARTICLE_AUTHOR_INDEX, ARTICLE_TABLE, AUTHOR_TABLE, CONTENT_INDEX,
    PRIMARY_INDEX, SUBJECTS_INDEX, TITLE_INDEX,
};

use crate::index::Indexer;
use crate::record::RecordKind;

pub use builder::{SchemaBuilder, TableBuilder};

/// Definition of one index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexSchema {
    name: String,
    unique: bool,
    allow_missing: bool,
    indexer: Indexer,
}

impl IndexSchema {
    /// Creates a non-unique index that requires a value.
    pub fn new(name: impl Into<String>, indexer: Indexer) -> Self {
        Self {
            name: name.into(),
            unique: false,
            allow_missing: false,
            indexer,
        }
    }

    /// Sets whether keys are unique across records.
    #[must_use]
    pub fn unique(mut self, unique: bool) -> Self {
        self.unique = unique;
        self
    }

    /// Sets whether records without a value are accepted (and left out of
    /// this index) instead of rejected.
    #[must_use]
    pub fn allow_missing(mut self, allow: bool) -> Self {
        self.allow_missing = allow;
        self
    }

    /// Index name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether keys are unique.
    pub fn is_unique(&self) -> bool {
        self.unique
    }

    /// Whether records may lack a value.
    pub fn allows_missing(&self) -> bool {
        self.allow_missing
    }

    /// Key extraction rule.
    pub fn indexer(&self) -> &Indexer {
        &self.indexer
    }
}

/// Definition of one table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSchema {
    name: String,
    kind: RecordKind,
    indexes: BTreeMap<String, IndexSchema>,
}

impl TableSchema {
    /// Starts a table definition.
    pub fn builder(name: impl Into<String>, kind: RecordKind) -> TableBuilder {
        TableBuilder::new(name, kind)
    }

    /// Table name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Record kind stored in this table.
    pub fn kind(&self) -> RecordKind {
        self.kind
    }

    /// Looks up an index by name.
    pub fn index(&self, name: &str) -> Option<&IndexSchema> {
        self.indexes.get(name)
    }

    /// Looks up an index by name, failing with `IndexNotFound`.
    pub fn require_index(&self, name: &str) -> FolioResult<&IndexSchema> {
        self.index(name)
            .ok_or_else(|| FolioError::index_not_found(&self.name, name))
    }

    /// The primary (`id`) index.
    pub fn primary(&self) -> &IndexSchema {
        // Presence is checked by the builder.
        &self.indexes[PRIMARY_INDEX]
    }

    /// All indexes, ordered by name.
    pub fn indexes(&self) -> impl Iterator<Item = &IndexSchema> {
        self.indexes.values()
    }
}

/// The complete, immutable schema.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DbSchema {
    tables: BTreeMap<String, TableSchema>,
}

impl DbSchema {
    /// Starts a schema definition.
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::new()
    }

    /// Looks up a table by name.
    pub fn table(&self, name: &str) -> Option<&TableSchema> {
        self.tables.get(name)
    }

    /// Looks up a table by name, failing with `TableNotFound`.
    pub fn require_table(&self, name: &str) -> FolioResult<&TableSchema> {
        self.table(name)
            .ok_or_else(|| FolioError::table_not_found(name))
    }

    /// All tables, ordered by name.
    pub fn tables(&self) -> impl Iterator<Item = &TableSchema> {
        self.tables.values()
    }

    /// Number of tables.
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Returns true if the schema defines no tables.
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

/// The schema the Folio service runs with: authors and articles.
pub fn library_schema() -> FolioResult<DbSchema> {
    DbSchema::builder()
        .table(
            TableSchema::builder(AUTHOR_TABLE, RecordKind::Author)
                .index(IndexSchema::new(PRIMARY_INDEX, Indexer::uint("id")).unique(true))
                .index(IndexSchema::new(SUBJECTS_INDEX, Indexer::string_list("subjects"))),
        )
        .table(
            TableSchema::builder(ARTICLE_TABLE, RecordKind::Article)
                .index(IndexSchema::new(PRIMARY_INDEX, Indexer::uint("id")).unique(true))
                .index(IndexSchema::new(TITLE_INDEX, Indexer::string("title")))
                .index(IndexSchema::new(CONTENT_INDEX, Indexer::string("content")))
                .index(IndexSchema::new(ARTICLE_AUTHOR_INDEX, Indexer::string("author"))),
        )
        .build()
}
