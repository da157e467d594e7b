//! Router setup and configuration

use std::sync::Arc;

use axum::{routing::get, Router};

use crate::api::handlers;
use crate::api::state::AppState;

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthcheck", get(handlers::healthcheck))
        .route(
            "/authors",
            get(handlers::list_authors).post(handlers::create_author),
        )
        .route("/authors/:id", get(handlers::get_author))
        .with_state(state)
}
