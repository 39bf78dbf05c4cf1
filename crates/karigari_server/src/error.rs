//! Mapping from pipeline errors to HTTP responses.

use crate::response::ApiResponse;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use karigari_error::{AccessErrorKind, KarigariError, KarigariErrorKind, ModelErrorKind, RecordErrorKind};

/// An error ready to leave the API boundary: an HTTP status plus a
/// human-readable message, with no collaborator internals attached.
#[derive(Debug)]
pub struct ApiError {
    /// HTTP status to respond with
    pub status: StatusCode,
    /// Message placed in the error envelope
    pub message: String,
}

impl ApiError {
    /// A 400 with the given message.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    /// A 401 with the given message.
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            message: message.into(),
        }
    }
}

impl From<KarigariError> for ApiError {
    fn from(err: KarigariError) -> Self {
        let (status, message) = match err.kind() {
            KarigariErrorKind::Validation(e) => (StatusCode::BAD_REQUEST, e.message.clone()),
            KarigariErrorKind::Access(e) => match &e.kind {
                AccessErrorKind::Unauthorized(msg) => {
                    (StatusCode::UNAUTHORIZED, format!("Unauthorized: {}", msg))
                }
                AccessErrorKind::Forbidden(msg) => {
                    (StatusCode::FORBIDDEN, format!("Forbidden: {}", msg))
                }
            },
            KarigariErrorKind::NotFound(e) => {
                (StatusCode::NOT_FOUND, format!("{} not found", e.resource))
            }
            KarigariErrorKind::Record(e) => match &e.kind {
                RecordErrorKind::NotFound(resource) => {
                    (StatusCode::NOT_FOUND, format!("{} not found", resource))
                }
                kind => (StatusCode::INTERNAL_SERVER_ERROR, kind.to_string()),
            },
            KarigariErrorKind::Model(e) => match &e.kind {
                ModelErrorKind::Timeout(secs) => (
                    StatusCode::GATEWAY_TIMEOUT,
                    format!("Model call timed out after {}s", secs),
                ),
                kind => (StatusCode::INTERNAL_SERVER_ERROR, kind.to_string()),
            },
            KarigariErrorKind::Storage(e) => {
                (StatusCode::INTERNAL_SERVER_ERROR, e.kind.to_string())
            }
            KarigariErrorKind::Http(e) => {
                (StatusCode::INTERNAL_SERVER_ERROR, e.message.clone())
            }
            KarigariErrorKind::Json(e) => {
                (StatusCode::INTERNAL_SERVER_ERROR, e.message.clone())
            }
            KarigariErrorKind::Config(e) => {
                (StatusCode::INTERNAL_SERVER_ERROR, e.message.clone())
            }
            KarigariErrorKind::Backend(e) => {
                (StatusCode::INTERNAL_SERVER_ERROR, e.message.clone())
            }
        };

        if status.is_server_error() {
            tracing::error!(error = %err, "Request failed");
        } else {
            tracing::debug!(error = %err, "Request rejected");
        }

        Self { status, message }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ApiResponse::error(self.message))).into_response()
    }
}
