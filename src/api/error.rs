//! JSON error responses.
//!
//! Every failure leaves the API as `{"error": "<message>"}`. Client errors
//! carry the specific message; internal errors are logged server-side and
//! the client only sees a generic one.

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use uuid::Uuid;

use crate::error::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(serde_json::json!({ "error": self.message })),
        )
            .into_response()
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        match err {
            Error::ProjectNotFound | Error::TaskNotFound => {
                tracing::warn!("Not found: {}", err);
                Self::new(StatusCode::NOT_FOUND, err.to_string())
            }
            Error::Validation(_) | Error::InvalidTransition { .. } => {
                tracing::warn!("Validation error: {}", err);
                Self::bad_request(err.to_string())
            }
            Error::Internal(e) => internal_error(e, "Internal server error"),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::warn!("Rejected request body: {}", rejection.body_text());
        Self::bad_request(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        tracing::warn!("Rejected query string: {}", rejection.body_text());
        Self::bad_request(rejection.body_text())
    }
}

/// Log the full error chain and return a 500 carrying only `public_message`.
pub fn internal_error(e: anyhow::Error, public_message: &str) -> ApiError {
    tracing::error!("Internal error: {:#}", e);
    ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, public_message)
}

/// Like `ApiError::from`, but with a read-path specific message for internal
/// failures.
pub fn masked(err: Error, public_message: &str) -> ApiError {
    match err {
        Error::Internal(e) => internal_error(e, public_message),
        other => other.into(),
    }
}

/// Parse a path identifier. A malformed id cannot name an existing entity,
/// so it is reported as `not_found`.
pub fn parse_id(raw: &str, not_found: Error) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| not_found.into())
}
