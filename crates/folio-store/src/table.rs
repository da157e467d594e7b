//! Per-table record storage with index maintenance.
//!
//! `TableData` owns a table's rows and one [`IndexTree`] per index. All
//! mutation goes through [`TableData::insert`], which validates the new
//! record against every index before touching anything: an insert either
//! updates the rows and all indexes, or fails and leaves the table exactly
//! as it was.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use folio_common::{FolioError, FolioResult};

use crate::index::{IndexKey, IndexTree};
use crate::record::Record;
use crate::schema::TableSchema;

/// Rows and indexes of one table.
///
/// Rows are held as `Arc<Record>`: cloning a `TableData` for copy-on-write
/// copies the maps but shares every record, and stored records can never
/// be mutated in place.
#[derive(Debug, Clone)]
pub struct TableData {
    rows: BTreeMap<IndexKey, Arc<Record>>,
    indexes: HashMap<String, IndexTree>,
}

/// Keys computed for one index during an insert.
struct IndexPlan<'s> {
    name: &'s str,
    new_keys: Vec<IndexKey>,
    old_keys: Vec<IndexKey>,
}

impl TableData {
    /// Creates empty storage with one tree per index of `schema`.
    pub fn new(schema: &TableSchema) -> Self {
        Self {
            rows: BTreeMap::new(),
            indexes: schema
                .indexes()
                .map(|index| (index.name().to_string(), IndexTree::new()))
                .collect(),
        }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if the table holds no records.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns the record stored under a primary key.
    pub fn row(&self, pk: &IndexKey) -> Option<&Arc<Record>> {
        self.rows.get(pk)
    }

    /// Returns the tree of an index.
    pub fn index(&self, name: &str) -> Option<&IndexTree> {
        self.indexes.get(name)
    }

    /// Inserts or replaces (by primary key) a record.
    ///
    /// Returns the record it replaced, if any.
    pub fn insert(
        &mut self,
        schema: &TableSchema,
        record: Record,
    ) -> FolioResult<Option<Arc<Record>>> {
        if record.kind() != schema.kind() {
            return Err(FolioError::RecordKindMismatch {
                table: schema.name().to_string(),
                expected: schema.kind().to_string(),
                actual: record.kind().to_string(),
            });
        }

        let pk = primary_key(schema, &record)?;
        let existing = self.rows.get(&pk).cloned();

        // Validate every index first; nothing is modified until all pass.
        let mut plans = Vec::new();
        for index in schema.indexes() {
            let new_keys = index.indexer().keys_for(&record)?;
            if new_keys.is_empty() && !index.allows_missing() {
                return Err(FolioError::MissingIndexValue {
                    table: schema.name().to_string(),
                    index: index.name().to_string(),
                });
            }

            let tree = self.tree(schema, index.name())?;
            if index.is_unique() && new_keys.iter().any(|k| tree.is_taken_by_other(k, &pk)) {
                return Err(FolioError::UniqueConstraintViolation {
                    table: schema.name().to_string(),
                    index: index.name().to_string(),
                });
            }

            let old_keys = match &existing {
                Some(old) => index.indexer().keys_for(old)?,
                None => Vec::new(),
            };
            plans.push(IndexPlan {
                name: index.name(),
                new_keys,
                old_keys,
            });
        }

        for plan in plans {
            let tree = self
                .indexes
                .get_mut(plan.name)
                .ok_or_else(|| FolioError::index_not_found(schema.name(), plan.name))?;
            for key in plan.old_keys {
                tree.remove(key, pk.clone());
            }
            for key in plan.new_keys {
                tree.insert(key, pk.clone());
            }
        }

        Ok(self.rows.insert(pk, Arc::new(record)))
    }

    fn tree(&self, schema: &TableSchema, name: &str) -> FolioResult<&IndexTree> {
        self.indexes
            .get(name)
            .ok_or_else(|| FolioError::index_not_found(schema.name(), name))
    }
}

/// Encodes the primary key of a record.
pub(crate) fn primary_key(schema: &TableSchema, record: &Record) -> FolioResult<IndexKey> {
    let mut keys = schema.primary().indexer().keys_for(record)?;
    match keys.len() {
        1 => Ok(keys.remove(0)),
        n => Err(FolioError::internal(format!(
            "primary index of '{}' produced {} keys",
            schema.name(),
            n
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::Indexer;
    use crate::record::{Article, Author, RecordKind};
    use crate::schema::{library_schema, DbSchema, IndexSchema};

    fn author_table() -> (TableSchema, TableData) {
        let schema = library_schema().unwrap();
        let table = schema.table("author").unwrap().clone();
        let data = TableData::new(&table);
        (table, data)
    }

    fn subjects(data: &TableData, subject: &str) -> Vec<IndexKey> {
        let key = IndexKey::from_text(subject, false);
        data.index("subjects")
            .unwrap()
            .holders(&key)
            .cloned()
            .collect()
    }

    #[test]
    fn test_insert_maintains_all_indexes() {
        let (schema, mut data) = author_table();
        data.insert(&schema, Author::new(1, "Ada", ["math", "cs"]).into())
            .unwrap();
        data.insert(&schema, Author::new(2, "Grace", ["cs"]).into())
            .unwrap();

        assert_eq!(data.len(), 2);
        assert_eq!(data.index("id").unwrap().len(), 2);
        assert_eq!(data.index("subjects").unwrap().len(), 3);
        assert_eq!(
            subjects(&data, "cs"),
            vec![IndexKey::from_uint(1), IndexKey::from_uint(2)]
        );
    }

    #[test]
    fn test_upsert_replaces_old_index_entries() {
        let (schema, mut data) = author_table();
        data.insert(&schema, Author::new(1, "Ada", ["math"]).into())
            .unwrap();
        let replaced = data
            .insert(&schema, Author::new(1, "Ada L.", ["cs"]).into())
            .unwrap();

        assert_eq!(replaced.unwrap().as_author().unwrap().name, "Ada");
        assert_eq!(data.len(), 1);
        assert!(subjects(&data, "math").is_empty());
        assert_eq!(subjects(&data, "cs"), vec![IndexKey::from_uint(1)]);

        let stored = data.row(&IndexKey::from_uint(1)).unwrap();
        assert_eq!(stored.as_author().unwrap().name, "Ada L.");
    }

    #[test]
    fn test_kind_mismatch_rejected() {
        let (schema, mut data) = author_table();
        let err = data
            .insert(&schema, Article::new(1, "t", "c", "a").into())
            .unwrap_err();
        assert!(matches!(err, FolioError::RecordKindMismatch { .. }));
        assert!(data.is_empty());
    }

    #[test]
    fn test_unique_violation_leaves_table_untouched() {
        let table = TableSchema::builder("author", RecordKind::Author)
            .index(IndexSchema::new("id", Indexer::uint("id")).unique(true))
            .index(IndexSchema::new("name", Indexer::string("name")).unique(true))
            .index(
                IndexSchema::new("subjects", Indexer::string_list("subjects"))
                    .allow_missing(true),
            );
        let schema: DbSchema = DbSchema::builder().table(table).build().unwrap();
        let schema = schema.table("author").unwrap();
        let mut data = TableData::new(schema);

        data.insert(schema, Author::new(1, "Ada", ["math"]).into())
            .unwrap();
        let err = data
            .insert(schema, Author::new(2, "Ada", ["cs"]).into())
            .unwrap_err();

        assert!(matches!(
            err,
            FolioError::UniqueConstraintViolation { ref index, .. } if index == "name"
        ));
        assert_eq!(data.len(), 1);
        assert!(subjects(&data, "cs").is_empty());
        assert_eq!(data.index("id").unwrap().len(), 1);

        // Re-inserting the holder of the unique key is an update, not a clash.
        data.insert(schema, Author::new(1, "Ada", ["cs"]).into())
            .unwrap();
        assert_eq!(subjects(&data, "cs"), vec![IndexKey::from_uint(1)]);
    }

    #[test]
    fn test_missing_value_rejected_unless_allowed() {
        let schema = library_schema().unwrap();
        let articles = schema.table("article").unwrap();
        let mut data = TableData::new(articles);

        let err = data
            .insert(articles, Article::new(1, "", "body", "Ada").into())
            .unwrap_err();
        assert!(matches!(
            err,
            FolioError::MissingIndexValue { ref index, .. } if index == "title"
        ));
        assert!(data.is_empty());

        let (authors, mut data) = author_table();
        for subjects in [Vec::new(), vec![String::new()]] {
            let err = data
                .insert(&authors, Author::new(5, "Anon", subjects).into())
                .unwrap_err();
            assert!(matches!(
                err,
                FolioError::MissingIndexValue { ref index, .. } if index == "subjects"
            ));
        }
        assert!(data.is_empty());
        assert!(data.index("id").unwrap().is_empty());

        let optional = TableSchema::builder("author", RecordKind::Author)
            .index(IndexSchema::new("id", Indexer::uint("id")).unique(true))
            .index(
                IndexSchema::new("subjects", Indexer::string_list("subjects"))
                    .allow_missing(true),
            );
        let schema: DbSchema = DbSchema::builder().table(optional).build().unwrap();
        let optional = schema.table("author").unwrap();
        let mut data = TableData::new(optional);
        data.insert(optional, Author::new(5, "Anon", Vec::<String>::new()).into())
            .unwrap();
        assert_eq!(data.len(), 1);
        assert!(data.index("subjects").unwrap().is_empty());
    }

    #[test]
    fn test_upsert_to_empty_subjects_keeps_old_record() {
        let (schema, mut data) = author_table();
        data.insert(&schema, Author::new(1, "Ada", ["math"]).into())
            .unwrap();
        let err = data
            .insert(&schema, Author::new(1, "Augusta", Vec::<String>::new()).into())
            .unwrap_err();

        assert!(matches!(err, FolioError::MissingIndexValue { .. }));
        let stored = data.row(&IndexKey::from_uint(1)).unwrap();
        assert_eq!(stored.as_author().unwrap().name, "Ada");
        assert_eq!(subjects(&data, "math"), vec![IndexKey::from_uint(1)]);
    }
}
