// src/engine/current.rs

//! The "what is running right now" slot.

use std::sync::{Arc, Mutex};

use super::task::{OutputBuffer, TaskId};

/// Reference to the task the worker is executing at this moment.
#[derive(Debug, Clone)]
pub struct RunningTask {
    pub id: TaskId,
    pub buffer: OutputBuffer,
}

/// Mutex-guarded slot holding the in-flight task, empty when the worker is
/// idle.
///
/// The worker is the only writer; readers copy the id or the buffer
/// contents out under the lock and release it before doing anything else.
#[derive(Debug, Clone, Default)]
pub struct CurrentRun {
    slot: Arc<Mutex<Option<RunningTask>>>,
}

impl CurrentRun {
    pub fn new() -> Self {
        CurrentRun::default()
    }

    pub(crate) fn set(&self, running: RunningTask) {
        *self.slot.lock().unwrap() = Some(running);
    }

    pub(crate) fn clear(&self) {
        *self.slot.lock().unwrap() = None;
    }

    /// Id of the in-flight task, or `None` when idle.
    pub fn current_id(&self) -> Option<TaskId> {
        self.slot.lock().unwrap().as_ref().map(|run| run.id.clone())
    }

    /// Copy of the in-flight task's output captured so far, or `None` when
    /// idle. Mid-run reads are expected; the copy is whatever the process
    /// has produced up to this instant.
    pub fn current_output(&self) -> Option<Vec<u8>> {
        self.slot
            .lock()
            .unwrap()
            .as_ref()
            .map(|run| run.buffer.lock().unwrap().clone())
    }
}
