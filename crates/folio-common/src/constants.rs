//! System-wide constants for Folio.

// =============================================================================
// Built-in Schema Names
// =============================================================================

/// Name of the author table.
pub const AUTHOR_TABLE: &str = "author";

/// Name of the article table.
pub const ARTICLE_TABLE: &str = "article";

/// Name of the primary index every table carries.
///
/// The primary index is always unique and keyed by the record's `id` field.
pub const PRIMARY_INDEX: &str = "id";

/// Name of the multi-valued author subjects index.
pub const SUBJECTS_INDEX: &str = "subjects";

/// Name of the article title index.
pub const TITLE_INDEX: &str = "title";

/// Name of the article content index.
pub const CONTENT_INDEX: &str = "content";

/// Name of the article author index.
pub const ARTICLE_AUTHOR_INDEX: &str = "author";

// =============================================================================
// Index Key Encoding
// =============================================================================

/// Terminator appended to every encoded string key.
///
/// Keeps `"ab"` ordered before `"abc"` and makes exact matches distinguishable
/// from prefix matches.
pub const STRING_KEY_TERMINATOR: u8 = 0x00;

/// Width in bytes of an encoded unsigned integer key.
pub const UINT_KEY_WIDTH: usize = 8;

// =============================================================================
// Server Defaults
// =============================================================================

/// Default HTTP listen host.
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default HTTP listen port.
pub const DEFAULT_PORT: u16 = 8080;

/// Body returned by the liveness endpoint.
pub const HEALTHCHECK_BODY: &str = "Current I'm alive\n";
