//! # folio-server
//!
//! HTTP service for Folio.
//!
//! This crate provides:
//! - Server configuration (`config`)
//! - The axum router, handlers and error mapping (`api`)
//! - The `foliod` binary (`src/bin/foliod.rs`)

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod api;
pub mod config;

pub use api::{create_router, AppState};
pub use config::ServerConfig;
