// src/engine/worker.rs

//! The single-flight worker loop.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{error, info, warn};

use crate::exec::{RunOutcome, ScriptRunner};
use crate::storage::LogArchive;

use super::current::{CurrentRun, RunningTask};
use super::registry::TaskRegistry;
use super::task::{Task, TaskStatus};

/// Receive tasks from the submission queue and run them one at a time,
/// in arrival order, until the channel closes.
///
/// Each run is awaited inline. The next task cannot start until the
/// previous one has finished, its log file has been archived and the
/// current-run slot has been cleared.
pub(crate) async fn run_worker(
    mut queue_rx: mpsc::Receiver<Task>,
    registry: Arc<TaskRegistry>,
    current: CurrentRun,
    runner: Arc<dyn ScriptRunner>,
    archive: LogArchive,
) {
    info!("worker loop started");

    while let Some(task) = queue_rx.recv().await {
        execute_task(task, &registry, &current, runner.as_ref(), &archive).await;
    }

    info!("worker loop stopped (submission queue closed)");
}

/// Drive one task through `running` → `completed`.
///
/// A failed run never aborts the loop: failures are logged, the task still
/// completes and the next task still runs.
async fn execute_task(
    mut task: Task,
    registry: &TaskRegistry,
    current: &CurrentRun,
    runner: &dyn ScriptRunner,
    archive: &LogArchive,
) {
    info!(task = %task.id, "starting task");

    task.status = TaskStatus::Running;
    registry.put(task.clone());
    current.set(RunningTask {
        id: task.id.clone(),
        buffer: Arc::clone(&task.buffer),
    });

    match runner.run(task.clone()).await {
        Ok(RunOutcome::Exited(code)) if code != 0 => {
            warn!(task = %task.id, exit_code = code, "script exited with non-zero status");
        }
        Ok(RunOutcome::Exited(_)) => {
            info!(task = %task.id, "script finished");
        }
        Ok(RunOutcome::Canceled) => {
            info!(task = %task.id, "script run was canceled");
        }
        Err(err) => {
            error!(task = %task.id, error = %err, "script execution error");
            let mut buffer = task.buffer.lock().unwrap();
            buffer.extend_from_slice(format!("script execution error: {err}\n").as_bytes());
        }
    }

    task.status = TaskStatus::Completed;
    registry.put(task.clone());
    current.clear();

    // Archive whatever was captured, including empty output for tasks
    // cancelled before launch. Failure to archive must not take the
    // worker down.
    let content = task.buffer.lock().unwrap().clone();
    if let Err(err) = archive.write(&task.id, &content).await {
        warn!(task = %task.id, error = %err, "failed to archive task output");
    }
}
