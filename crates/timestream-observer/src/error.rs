//! HTTP-facing errors for the observer.
//!
//! Every failure renders as `{"error": <message>, "status": <code>}`.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Errors returned by observer handlers.
#[derive(Debug, thiserror::Error)]
pub enum ObserverError {
    /// No record of `kind` has the given id.
    #[error("{kind} {id} not found")]
    NotFound {
        /// Record kind, e.g. `persona`.
        kind: &'static str,
        /// The id that was looked up.
        id: String,
    },

    /// A query parameter was out of range or malformed.
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// Snapshot data could not be encoded.
    #[error("encoding failed: {0}")]
    Encode(#[from] serde_json::Error),
}

impl ObserverError {
    /// Status code the error maps to.
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::InvalidQuery(_) => StatusCode::BAD_REQUEST,
            Self::Encode(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ObserverError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = serde_json::json!({
            "error": self.to_string(),
            "status": status.as_u16(),
        });
        (status, Json(body)).into_response()
    }
}
