//! Request handlers.

mod authors;
mod health;

pub use authors::{create_author, get_author, list_authors, ListParams};
pub use health::healthcheck;
