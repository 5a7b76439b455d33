//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server faults to Sentry
//! before responding to the client. All route handlers return
//! `Result<T, AppError>`.
//!
//! Every error response has the same JSON shape:
//!
//! ```json
//! { "error": { "Not found": "We did not find any cafe with given ID." } }
//! ```

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::services::catalog::CatalogError;

/// Message returned when an ID does not resolve to a cafe.
pub const CAFE_NOT_FOUND_MESSAGE: &str = "We did not find any cafe with given ID.";

/// Message returned when a location search has no match.
pub const LOCATION_NOT_FOUND_MESSAGE: &str = "We did not find any of cafes in your location.";

/// Application-level error type for the server.
#[derive(Debug, Error)]
pub enum AppError {
    /// Catalog operation failed.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl AppError {
    /// Whether this error is a server-side fault rather than a client mistake.
    const fn is_server_fault(&self) -> bool {
        matches!(self, Self::Catalog(CatalogError::Repository(_)))
    }

    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Catalog(err) => match err {
                CatalogError::Validation(_) => StatusCode::BAD_REQUEST,
                CatalogError::Conflict(_) => StatusCode::CONFLICT,
                CatalogError::NotFound(_) | CatalogError::EmptyCollection => StatusCode::NOT_FOUND,
                CatalogError::Unauthorized => StatusCode::FORBIDDEN,
                CatalogError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Error kind label and client-facing message.
    ///
    /// Internal error details are never exposed to clients.
    fn kind_and_message(&self) -> (&'static str, String) {
        match self {
            Self::Catalog(err) => match err {
                CatalogError::Validation(e) => ("Bad request", e.to_string()),
                CatalogError::Conflict(msg) => ("Conflict", msg.clone()),
                CatalogError::NotFound(_) => ("Not found", CAFE_NOT_FOUND_MESSAGE.to_string()),
                CatalogError::EmptyCollection => (
                    "Not found",
                    "There are no cafes in the catalog yet.".to_string(),
                ),
                CatalogError::Unauthorized => ("Forbidden", "Not valid API key used.".to_string()),
                CatalogError::Repository(_) => {
                    ("Internal error", "Internal server error".to_string())
                }
            },
            Self::NotFound(msg) => ("Not found", msg.clone()),
            Self::BadRequest(msg) => ("Bad request", msg.clone()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if self.is_server_fault() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        } else {
            tracing::debug!(error = %self, "Request rejected");
        }

        let status = self.status();
        let (kind, message) = self.kind_and_message();

        (status, Json(json!({ "error": { kind: message } }))).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
