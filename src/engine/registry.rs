// src/engine/registry.rs

//! Concurrent task registry.

use dashmap::DashMap;

use super::TaskBrief;
use super::task::{Task, TaskId, TaskStatus};

/// Shared id → task map, written by submitters and the worker, read by the
/// HTTP handlers.
///
/// `put` overwrites unconditionally: whoever writes last wins. That is what
/// makes re-uploading a script with the same name replace the old record.
#[derive(Debug, Default)]
pub struct TaskRegistry {
    tasks: DashMap<TaskId, Task>,
}

impl TaskRegistry {
    pub fn new() -> Self {
        TaskRegistry {
            tasks: DashMap::new(),
        }
    }

    /// Insert or replace the record for `task.id`.
    pub fn put(&self, task: Task) {
        self.tasks.insert(task.id.clone(), task);
    }

    /// Clone of the record for `id`, if present.
    pub fn get(&self, id: &str) -> Option<Task> {
        self.tasks.get(id).map(|entry| entry.value().clone())
    }

    /// Snapshot of all queued and running tasks, in no particular order.
    ///
    /// Completed tasks stay in the map (their log files outlive them) but
    /// are not part of the active view.
    pub fn list_active(&self) -> Vec<TaskBrief> {
        self.tasks
            .iter()
            .filter(|entry| entry.status != TaskStatus::Completed)
            .map(|entry| TaskBrief {
                id: entry.id.clone(),
                status: entry.status,
            })
            .collect()
    }
}
