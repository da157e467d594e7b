//! Author endpoint handlers

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Bytes,
    extract::{
        rejection::{PathRejection, QueryRejection},
        Path, Query, State,
    },
    Json,
};
use folio_common::{FolioError, FolioResult, AUTHOR_TABLE, PRIMARY_INDEX, SUBJECTS_INDEX};
use folio_store::{Author, IndexQuery, Record, Store};
use serde::Deserialize;
use tracing::{error, info, warn};

use crate::api::error::ApiError;
use crate::api::state::AppState;

/// Query parameters of `GET /authors`.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    /// Only authors writing about this subject.
    pub subject: Option<String>,
}

/// POST /authors - Insert or replace an author
///
/// Echoes the stored author as a JSON object.
pub async fn create_author(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<Author>, ApiError> {
    let author: Author = serde_json::from_slice(&body)
        .map_err(|e| ApiError::BadRequest(format!("invalid author: {e}")))?;
    let id = author.id;

    // Waiting for the writer lock blocks the thread.
    let store = Arc::clone(&state.store);
    let timeout = state.write_timeout;
    let result = tokio::task::spawn_blocking(move || insert_author(&store, timeout, author))
        .await
        .map_err(|e| ApiError::Internal(format!("insert task failed: {e}")))?;

    match result {
        Ok(stored) => {
            info!(id, subjects = stored.subjects.len(), "author stored");
            Ok(Json(stored))
        }
        Err(e @ FolioError::Timeout { .. }) => {
            warn!(id, error = %e, "write lock busy");
            Err(e.into())
        }
        Err(e) => {
            error!(id, error = %e, "failed to store author");
            Err(e.into())
        }
    }
}

/// GET /authors - List authors in id order
///
/// With `?subject=<s>`, lists only the authors whose subjects contain `s`.
pub async fn list_authors(
    State(state): State<Arc<AppState>>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<Vec<Author>>, ApiError> {
    let Query(params) =
        params.map_err(|e| ApiError::BadRequest(format!("invalid query: {}", e.body_text())))?;
    let (index, query) = match params.subject {
        Some(subject) => (SUBJECTS_INDEX, IndexQuery::exact(subject)),
        None => (PRIMARY_INDEX, IndexQuery::All),
    };

    scan_authors(&state.store, index, query)
        .map(Json)
        .map_err(|e| {
            error!(index, error = %e, "failed to list authors");
            e.into()
        })
}

/// GET /authors/:id - Fetch one author
pub async fn get_author(
    State(state): State<Arc<AppState>>,
    id: Result<Path<u64>, PathRejection>,
) -> Result<Json<Author>, ApiError> {
    let Path(id) =
        id.map_err(|e| ApiError::BadRequest(format!("invalid author id: {}", e.body_text())))?;
    let txn = state.store.read_txn();
    let found = txn
        .first(AUTHOR_TABLE, PRIMARY_INDEX, IndexQuery::exact(id))
        .map_err(|e| {
            error!(id, error = %e, "author lookup failed");
            ApiError::from(e)
        })?;

    match found {
        Some(record) => Ok(Json(to_author(&record)?)),
        None => Err(ApiError::NotFound(format!("author {id} not found"))),
    }
}

fn insert_author(store: &Store, timeout: Option<Duration>, author: Author) -> FolioResult<Author> {
    let mut txn = match timeout {
        Some(timeout) => store.write_txn_timeout(timeout)?,
        None => store.write_txn(),
    };
    txn.insert(AUTHOR_TABLE, author.clone())?;
    txn.commit()?;
    Ok(author)
}

fn scan_authors(store: &Store, index: &str, query: IndexQuery) -> FolioResult<Vec<Author>> {
    let txn = store.read_txn();
    let records = txn.get(AUTHOR_TABLE, index, query)?;
    records.map(|record| to_author(&record)).collect()
}

fn to_author(record: &Record) -> FolioResult<Author> {
    record.as_author().cloned().ok_or_else(|| {
        FolioError::internal(format!(
            "{} record found in table '{AUTHOR_TABLE}'",
            record.kind()
        ))
    })
}
