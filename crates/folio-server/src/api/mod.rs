//! HTTP API.
//!
//! Routes:
//!
//! | method | path              | handler                       |
//! |--------|-------------------|-------------------------------|
//! | GET    | `/healthcheck`    | [`handlers::healthcheck`]     |
//! | POST   | `/authors`        | [`handlers::create_author`]   |
//! | GET    | `/authors`        | [`handlers::list_authors`]    |
//! | GET    | `/authors/:id`    | [`handlers::get_author`]      |

pub mod error;
pub mod handlers;
pub mod router;
pub mod state;

pub use error::{ApiError, ErrorResponse};
pub use router::create_router;
pub use state::AppState;
