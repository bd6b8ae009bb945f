// src/engine/task.rs

//! The task record shared between submitters, the worker and readers.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use serde::Serialize;
use tokio_util::sync::CancellationToken;

/// Canonical task id type. Ids are sanitized upload file names, so the same
/// name re-submitted maps to the same id.
pub type TaskId = String;

/// Combined stdout/stderr of one run, shared between the process pumps and
/// the status readers. Lock briefly, copy out, release.
pub type OutputBuffer = Arc<Mutex<Vec<u8>>>;

/// Lifecycle state of a task.
///
/// Transitions are strictly `Queued` → `Running` → `Completed`; there is no
/// separate cancelled state. A cancelled task still completes, it just gets
/// there without (or with a truncated) run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Queued,
    Running,
    Completed,
}

/// One submitted script.
///
/// Clones share the cancellation token and the output buffer, so a clone
/// held by a reader observes cancellation and output of the run. `status`
/// is plain data; the registry copy is the authoritative one.
#[derive(Debug, Clone)]
pub struct Task {
    pub id: TaskId,
    pub script_path: PathBuf,
    pub status: TaskStatus,
    pub cancel: CancellationToken,
    pub buffer: OutputBuffer,
}

impl Task {
    pub fn new(id: impl Into<TaskId>, script_path: impl Into<PathBuf>) -> Self {
        Task {
            id: id.into(),
            script_path: script_path.into(),
            status: TaskStatus::Queued,
            cancel: CancellationToken::new(),
            buffer: Arc::new(Mutex::new(Vec::new())),
        }
    }
}
