// src/engine/handle.rs

//! Client-side handle to the engine.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::{debug, info};

use crate::errors::{Result, ScriptqError};
use crate::types::WhenFull;

use super::current::CurrentRun;
use super::registry::TaskRegistry;
use super::task::{Task, TaskId, TaskStatus};
use super::{SubmitOutcome, TaskBrief};

/// Cloneable handle used by the HTTP layer (and tests) to talk to the
/// engine: submit work, request cancellation, observe state.
#[derive(Clone)]
pub struct EngineHandle {
    queue_tx: mpsc::Sender<Task>,
    registry: Arc<TaskRegistry>,
    current: CurrentRun,
    when_full: WhenFull,
}

impl EngineHandle {
    pub(crate) fn new(
        queue_tx: mpsc::Sender<Task>,
        registry: Arc<TaskRegistry>,
        current: CurrentRun,
        when_full: WhenFull,
    ) -> Self {
        EngineHandle {
            queue_tx,
            registry,
            current,
            when_full,
        }
    }

    /// Admit a new task: store it as `queued` and push it onto the bounded
    /// submission queue.
    ///
    /// A queue slot is reserved *before* the task record is stored, so a
    /// rejected submission leaves no trace in the registry, and a stored
    /// record is always already on its way to the worker.
    ///
    /// With [`WhenFull::Wait`] this call parks until a slot frees up; with
    /// [`WhenFull::Reject`] a full queue yields [`SubmitOutcome::QueueFull`]
    /// immediately.
    pub async fn submit(
        &self,
        id: impl Into<TaskId>,
        script_path: impl Into<PathBuf>,
    ) -> Result<SubmitOutcome> {
        let task = Task::new(id, script_path);

        let permit = match self.when_full {
            WhenFull::Wait => match self.queue_tx.reserve().await {
                Ok(permit) => permit,
                Err(_) => return Err(ScriptqError::QueueClosed),
            },
            WhenFull::Reject => match self.queue_tx.try_reserve() {
                Ok(permit) => permit,
                Err(TrySendError::Full(())) => {
                    info!(task = %task.id, "submission queue full, rejecting task");
                    return Ok(SubmitOutcome::QueueFull);
                }
                Err(TrySendError::Closed(())) => return Err(ScriptqError::QueueClosed),
            },
        };

        debug!(task = %task.id, script = %task.script_path.display(), "task queued");
        self.registry.put(task.clone());
        permit.send(task);

        Ok(SubmitOutcome::Accepted)
    }

    /// Request cancellation of a task by id.
    ///
    /// Returns as soon as the request is recorded on the task's token; the
    /// actual teardown happens asynchronously in the worker. Cancelling an
    /// already-completed task is a no-op. Unknown ids are an error.
    pub fn cancel(&self, id: &str) -> Result<()> {
        match self.registry.get(id) {
            Some(task) => {
                info!(task = %id, "cancellation requested");
                task.cancel.cancel();
                Ok(())
            }
            None => Err(ScriptqError::TaskNotFound(id.to_string())),
        }
    }

    /// Lifecycle state of a task, if the registry knows it.
    pub fn status(&self, id: &str) -> Option<TaskStatus> {
        self.registry.get(id).map(|task| task.status)
    }

    /// Id of the task executing right now, or `None` when idle.
    pub fn current_id(&self) -> Option<TaskId> {
        self.current.current_id()
    }

    /// Output captured so far for the task executing right now, or `None`
    /// when idle.
    pub fn current_output(&self) -> Option<Vec<u8>> {
        self.current.current_output()
    }

    /// Snapshot of all queued and running tasks.
    pub fn list_active(&self) -> Vec<TaskBrief> {
        self.registry.list_active()
    }
}
