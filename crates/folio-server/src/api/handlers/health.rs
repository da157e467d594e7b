//! Health check handler

use folio_common::HEALTHCHECK_BODY;

/// GET /healthcheck - Liveness check
///
/// Always answers 200 with a fixed plain-text body.
pub async fn healthcheck() -> &'static str {
    HEALTHCHECK_BODY
}
