// src/http/models.rs

//! Error mapping and shared response bits for the HTTP surface.

use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};

use crate::errors::ScriptqError;

/// Body of the status endpoints when no task is running.
pub const IDLE_BODY: &str = "None";

/// Failures surfaced by the HTTP handlers, mapped onto plain-text error
/// responses.
#[derive(Debug)]
pub enum HttpError {
    /// The upload request could not be parsed into a script submission.
    BadUpload(String),
    /// The submission queue is at capacity (reject policy only).
    QueueFull,
    /// Cancellation target not present in the registry.
    TaskNotFound,
    /// No archived log file under the requested name.
    LogNotFound,
    /// Anything else; the detail only goes to the server log.
    Internal(String),
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            HttpError::BadUpload(msg) => (StatusCode::BAD_REQUEST, msg),
            HttpError::QueueFull => (
                StatusCode::SERVICE_UNAVAILABLE,
                "Task queue is full".to_string(),
            ),
            HttpError::TaskNotFound => (StatusCode::NOT_FOUND, "Task not found".to_string()),
            HttpError::LogNotFound => (StatusCode::NOT_FOUND, "Log file not found".to_string()),
            HttpError::Internal(msg) => {
                tracing::error!(error = %msg, "internal error while handling request");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        (status, body).into_response()
    }
}

impl From<ScriptqError> for HttpError {
    fn from(err: ScriptqError) -> Self {
        match err {
            ScriptqError::TaskNotFound(_) => HttpError::TaskNotFound,
            other => HttpError::Internal(other.to_string()),
        }
    }
}

/// Raw bytes served as `text/plain`, used for captured script output that
/// is not guaranteed to be valid UTF-8.
pub fn text_bytes(bytes: Vec<u8>) -> Response {
    ([(header::CONTENT_TYPE, "text/plain")], bytes).into_response()
}
