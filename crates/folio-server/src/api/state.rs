//! Shared application state.

use std::sync::Arc;
use std::time::Duration;

use folio_common::FolioResult;
use folio_store::{library_schema, Store};

use crate::config::ServerConfig;

/// State shared by every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The record store.
    pub store: Arc<Store>,
    /// Deadline for acquiring the store's write lock; `None` waits.
    pub write_timeout: Option<Duration>,
}

impl AppState {
    /// Wraps an existing store.
    pub fn new(store: Arc<Store>, write_timeout: Option<Duration>) -> Self {
        Self {
            store,
            write_timeout,
        }
    }

    /// Builds an empty store with the author/article schema.
    pub fn from_config(config: &ServerConfig) -> FolioResult<Self> {
        let store = Store::new(library_schema()?);
        Ok(Self::new(Arc::new(store), config.write_timeout()))
    }
}
