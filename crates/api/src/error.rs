use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use reeltrack_core::error::CoreError;
use reeltrack_records::RecordsError;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and [`RecordsError`] for record
/// backend failures, and adds HTTP-specific variants. Implements
/// [`IntoResponse`] to produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `reeltrack_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A record backend error from `reeltrack_records`.
    #[error("Record backend error: {0}")]
    Records(#[from] RecordsError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} '{id}' not found"),
                ),
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
                CoreError::Unauthorized(msg) => {
                    (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone())
                }
                CoreError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone()),
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        "An internal error occurred".to_string(),
                    )
                }
            },

            // --- Record backend errors ---
            AppError::Records(err) => classify_records_error(err),

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

/// Classify a record backend error into an HTTP status, error code, and
/// sanitized message.
///
/// Everything maps to 502: the backend is an upstream dependency, and its
/// failure is never the caller's fault. Details are logged server-side
/// only; state is left at last-known-good for the client to retry.
fn classify_records_error(err: &RecordsError) -> (StatusCode, &'static str, String) {
    match err {
        RecordsError::Api { status, message } => {
            tracing::error!(upstream_status = status, error = %message, "Record backend API error");
        }
        other => {
            tracing::error!(error = %other, "Record backend error");
        }
    }
    (
        StatusCode::BAD_GATEWAY,
        "UPSTREAM_ERROR",
        "The record store is currently unavailable. Please try again.".to_string(),
    )
}
