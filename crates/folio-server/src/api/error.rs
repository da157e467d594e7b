//! API error response types

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use folio_common::{ErrorCode, FolioError};
use serde::Serialize;

/// API error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error message
    pub error: String,

    /// Machine-readable error code
    pub code: String,

    /// Whether the client may retry the same request
    pub retryable: bool,
}

/// Failure of a request handler.
#[derive(Debug)]
pub enum ApiError {
    /// The request body or parameters could not be understood.
    BadRequest(String),
    /// The addressed record does not exist.
    NotFound(String),
    /// The store rejected the operation.
    Store(FolioError),
    /// The handler itself failed (e.g. a blocking task panicked).
    Internal(String),
}

impl ApiError {
    /// HTTP status for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Store(e) if e.code() == ErrorCode::Timeout => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            ApiError::Store(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> String {
        match self {
            ApiError::BadRequest(_) => "BAD_REQUEST".to_string(),
            ApiError::NotFound(_) => "NOT_FOUND".to_string(),
            ApiError::Store(e) => e.code().to_string(),
            ApiError::Internal(_) => "INTERNAL".to_string(),
        }
    }

    fn message(&self) -> String {
        match self {
            ApiError::BadRequest(m) | ApiError::NotFound(m) | ApiError::Internal(m) => m.clone(),
            ApiError::Store(e) => e.to_string(),
        }
    }
}

impl From<FolioError> for ApiError {
    fn from(err: FolioError) -> Self {
        ApiError::Store(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let body = ErrorResponse {
            error: self.message(),
            code: self.code(),
            retryable: matches!(&self, ApiError::Store(e) if e.is_retryable()),
        };

        (status, Json(body)).into_response()
    }
}
