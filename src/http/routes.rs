// src/http/routes.rs

//! Route table and request handlers.

use std::path::Path as FsPath;

use axum::extract::{DefaultBodyLimit, Multipart, Path, State};
use axum::response::Response;
use axum::routing::{get, post};
use axum::{Json, Router};
use tower_http::services::ServeDir;
use tracing::info;

use crate::engine::{EngineHandle, SubmitOutcome, TaskBrief};
use crate::storage::{LogArchive, ScriptStore, sanitize_file_name};

use super::models::{HttpError, IDLE_BODY, text_bytes};

/// Maximum accepted upload size.
const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub engine: EngineHandle,
    pub scripts: ScriptStore,
    pub archive: LogArchive,
}

/// Build the full application router.
///
/// Everything under `/` that no API route claims is served from the static
/// directory (the upload UI).
pub fn create_router(state: AppState, static_dir: impl AsRef<FsPath>) -> Router {
    Router::new()
        .route("/upload", post(upload_handler))
        .route("/cancel/:id", get(cancel_handler))
        .route("/status", get(status_handler))
        .route("/current", get(current_handler))
        .route("/queue", get(queue_handler))
        .route("/logs", get(logs_handler))
        .route("/logs/:name", get(log_handler))
        .nest_service("/", ServeDir::new(static_dir.as_ref()))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(state)
}

/// `POST /upload`: store the uploaded script and queue it for execution.
///
/// Expects a multipart form with a `file` field. The sanitized file name
/// becomes the task id, so uploading `a.py` twice reuses the id `a.py`.
async fn upload_handler(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<String, HttpError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| HttpError::BadUpload("Failed to parse form".to_string()))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let file_name = field.file_name().map(sanitize_file_name).unwrap_or_default();
        if file_name.is_empty() {
            return Err(HttpError::BadUpload("Failed to get file".to_string()));
        }

        let contents = field
            .bytes()
            .await
            .map_err(|_| HttpError::BadUpload("Failed to parse form".to_string()))?;

        info!(task = %file_name, bytes = contents.len(), "received script upload");

        let script_path = state
            .scripts
            .save(&file_name, &contents)
            .await
            .map_err(|err| HttpError::Internal(err.to_string()))?;

        return match state.engine.submit(file_name.clone(), script_path).await? {
            SubmitOutcome::Accepted => Ok(format!("Task added. File name: {file_name}")),
            SubmitOutcome::QueueFull => Err(HttpError::QueueFull),
        };
    }

    Err(HttpError::BadUpload("Failed to get file".to_string()))
}

/// `GET /cancel/{id}`: request cancellation of a queued or running task.
async fn cancel_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<String, HttpError> {
    state.engine.cancel(&id)?;
    Ok(format!("Task {id} canceled"))
}

/// `GET /status`: live combined output of the running task, or `None`.
async fn status_handler(State(state): State<AppState>) -> Response {
    match state.engine.current_output() {
        Some(output) => text_bytes(output),
        None => text_bytes(IDLE_BODY.as_bytes().to_vec()),
    }
}

/// `GET /current`: id of the running task, or `None`.
async fn current_handler(State(state): State<AppState>) -> Response {
    match state.engine.current_id() {
        Some(id) => text_bytes(id.into_bytes()),
        None => text_bytes(IDLE_BODY.as_bytes().to_vec()),
    }
}

/// `GET /queue`: JSON snapshot of all queued and running tasks.
async fn queue_handler(State(state): State<AppState>) -> Json<Vec<TaskBrief>> {
    Json(state.engine.list_active())
}

/// `GET /logs`: JSON list of archived log file names.
async fn logs_handler(State(state): State<AppState>) -> Result<Json<Vec<String>>, HttpError> {
    let names = state
        .archive
        .list()
        .await
        .map_err(|err| HttpError::Internal(err.to_string()))?;
    Ok(Json(names))
}

/// `GET /logs/{name}`: content of one archived log file.
async fn log_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Response, HttpError> {
    match state.archive.read_file(&name).await {
        Ok(Some(content)) => Ok(text_bytes(content)),
        Ok(None) => Err(HttpError::LogNotFound),
        Err(err) => Err(HttpError::Internal(err.to_string())),
    }
}
