// src/engine/mod.rs

//! Task lifecycle engine for scriptq.
//!
//! This module ties together:
//! - the bounded submission queue (back-pressure for uploads)
//! - the registry of all known tasks and their lifecycle states
//! - the current-run slot (what is executing right now)
//! - the single-flight worker that runs one script at a time
//!
//! The worker owns every status transition after admission; submitters only
//! ever create `queued` records. How a script actually becomes a process is
//! behind the [`ScriptRunner`](crate::exec::ScriptRunner) trait.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::mpsc;

use crate::exec::ScriptRunner;
use crate::storage::LogArchive;

/// Result of a submission attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Task stored and queued for execution.
    Accepted,
    /// Queue at capacity under the `reject` policy; no task was created.
    QueueFull,
}

/// Registry snapshot entry, as exposed on the queue-listing endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskBrief {
    pub id: TaskId,
    pub status: TaskStatus,
}

/// Spawn the engine: the submission queue plus the single worker task.
///
/// Returns the handle submitters and readers share. The worker runs until
/// every handle clone (and with it the queue sender) has been dropped.
pub fn spawn_engine(
    queue_capacity: usize,
    when_full: WhenFull,
    runner: Arc<dyn ScriptRunner>,
    archive: LogArchive,
) -> EngineHandle {
    let (queue_tx, queue_rx) = mpsc::channel::<Task>(queue_capacity);
    let registry = Arc::new(TaskRegistry::new());
    let current = CurrentRun::new();

    tokio::spawn(worker::run_worker(
        queue_rx,
        Arc::clone(&registry),
        current.clone(),
        runner,
        archive,
    ));

    EngineHandle::new(queue_tx, registry, current, when_full)
}

pub mod current;
pub mod handle;
pub mod registry;
pub mod task;
mod worker;

pub use current::CurrentRun;
pub use handle::EngineHandle;
pub use registry::TaskRegistry;
pub use task::{OutputBuffer, Task, TaskId, TaskStatus};
pub use crate::types::WhenFull;
