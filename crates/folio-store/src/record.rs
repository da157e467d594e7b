//! Record types stored in Folio tables.
//!
//! Every table holds records of exactly one [`RecordKind`]. The store works
//! with the tagged union [`Record`]; callers usually build the concrete
//! [`Author`] or [`Article`] and convert with `into()`.
//!
//! Index extraction never touches struct fields directly. It goes through
//! [`Record::field`], which exposes a field by name as a [`FieldValue`]. The
//! schema builder checks index definitions against [`RecordKind::fields`]
//! so a lookup by name can only miss on a programming error.

use std::fmt;

use serde::{Deserialize, Serialize};

/// An author with the subjects they write about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    /// Primary key.
    pub id: u64,
    /// Display name.
    pub name: String,
    /// Subjects, each one indexed independently.
    #[serde(default)]
    pub subjects: Vec<String>,
}

impl Author {
    /// Creates an author.
    pub fn new<S: Into<String>>(
        id: u64,
        name: impl Into<String>,
        subjects: impl IntoIterator<Item = S>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            subjects: subjects.into_iter().map(Into::into).collect(),
        }
    }
}

/// An article. `author` is a free-text copy of the author's name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    /// Primary key.
    pub id: u64,
    /// Title.
    pub title: String,
    /// Body text.
    pub content: String,
    /// Author name.
    pub author: String,
}

impl Article {
    /// Creates an article.
    pub fn new(
        id: u64,
        title: impl Into<String>,
        content: impl Into<String>,
        author: impl Into<String>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            content: content.into(),
            author: author.into(),
        }
    }
}

/// The record variants a table can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    /// [`Author`] records.
    Author,
    /// [`Article`] records.
    Article,
}

impl RecordKind {
    /// Returns the kind name.
    pub const fn name(self) -> &'static str {
        match self {
            RecordKind::Author => "author",
            RecordKind::Article => "article",
        }
    }

    /// Returns the fields records of this kind expose to indexes.
    pub fn fields(self) -> &'static [FieldDef] {
        match self {
            RecordKind::Author => &AUTHOR_FIELDS,
            RecordKind::Article => &ARTICLE_FIELDS,
        }
    }

    /// Looks up a field definition by name.
    pub fn field(self, name: &str) -> Option<&'static FieldDef> {
        self.fields().iter().find(|f| f.name == name)
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Type of an indexable field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    /// Unsigned integer.
    Uint,
    /// UTF-8 string.
    String,
    /// Sequence of strings.
    StringList,
}

impl FieldType {
    /// Returns the type name used in error messages.
    pub const fn name(self) -> &'static str {
        match self {
            FieldType::Uint => "uint",
            FieldType::String => "string",
            FieldType::StringList => "string list",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A named, typed field of a record kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDef {
    /// Field name.
    pub name: &'static str,
    /// Field type.
    pub ty: FieldType,
}

static AUTHOR_FIELDS: [FieldDef; 3] = [
    FieldDef { name: "id", ty: FieldType::Uint },
    FieldDef { name: "name", ty: FieldType::String },
    FieldDef { name: "subjects", ty: FieldType::StringList },
];

static ARTICLE_FIELDS: [FieldDef; 4] = [
    FieldDef { name: "id", ty: FieldType::Uint },
    FieldDef { name: "title", ty: FieldType::String },
    FieldDef { name: "content", ty: FieldType::String },
    FieldDef { name: "author", ty: FieldType::String },
];

/// A borrowed field value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValue<'a> {
    /// Unsigned integer.
    Uint(u64),
    /// String.
    Str(&'a str),
    /// String sequence.
    StrList(&'a [String]),
}

impl FieldValue<'_> {
    /// Returns the type of this value.
    pub const fn field_type(&self) -> FieldType {
        match self {
            FieldValue::Uint(_) => FieldType::Uint,
            FieldValue::Str(_) => FieldType::String,
            FieldValue::StrList(_) => FieldType::StringList,
        }
    }
}

/// A record of any kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Record {
    /// An author.
    Author(Author),
    /// An article.
    Article(Article),
}

impl Record {
    /// Returns the record kind.
    pub const fn kind(&self) -> RecordKind {
        match self {
            Record::Author(_) => RecordKind::Author,
            Record::Article(_) => RecordKind::Article,
        }
    }

    /// Returns the primary key value.
    pub const fn id(&self) -> u64 {
        match self {
            Record::Author(a) => a.id,
            Record::Article(a) => a.id,
        }
    }

    /// Returns a field by name, or `None` if this kind has no such field.
    pub fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        match self {
            Record::Author(a) => match name {
                "id" => Some(FieldValue::Uint(a.id)),
                "name" => Some(FieldValue::Str(&a.name)),
                "subjects" => Some(FieldValue::StrList(&a.subjects)),
                _ => None,
            },
            Record::Article(a) => match name {
                "id" => Some(FieldValue::Uint(a.id)),
                "title" => Some(FieldValue::Str(&a.title)),
                "content" => Some(FieldValue::Str(&a.content)),
                "author" => Some(FieldValue::Str(&a.author)),
                _ => None,
            },
        }
    }

    /// Returns the author, if this is one.
    pub fn as_author(&self) -> Option<&Author> {
        match self {
            Record::Author(a) => Some(a),
            Record::Article(_) => None,
        }
    }

    /// Returns the article, if this is one.
    pub fn as_article(&self) -> Option<&Article> {
        match self {
            Record::Article(a) => Some(a),
            Record::Author(_) => None,
        }
    }
}

impl From<Author> for Record {
    fn from(author: Author) -> Self {
        Record::Author(author)
    }
}

impl From<Article> for Record {
    fn from(article: Article) -> Self {
        Record::Article(article)
    }
}
