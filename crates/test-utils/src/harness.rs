use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tempfile::TempDir;

use scriptq::engine::{EngineHandle, SubmitOutcome, TaskStatus, WhenFull, spawn_engine};
use scriptq::errors::Result;
use scriptq::exec::ScriptRunner;
use scriptq::storage::LogArchive;

use crate::fake_runner::FakeRunner;

/// A fully wired engine driving a [`FakeRunner`] against a fresh temp
/// directory, for tests that exercise queueing and lifecycle semantics
/// without real processes.
pub struct EngineHarness {
    pub engine: EngineHandle,
    pub runner: Arc<FakeRunner>,
    pub archive: LogArchive,
    temp: TempDir,
}

impl EngineHarness {
    /// Path a submitted script would live at. The fake runner never opens
    /// it, so no file is actually created.
    pub fn script_path(&self, id: &str) -> PathBuf {
        self.temp.path().join("scripts").join(id)
    }

    /// Submit a task whose id doubles as its script file name.
    pub async fn submit(&self, id: &str) -> Result<SubmitOutcome> {
        self.engine.submit(id, self.script_path(id)).await
    }

    /// Wait until the registry reports `id` as completed. Panics after ~2
    /// seconds so a wedged worker fails the test instead of hanging it.
    pub async fn wait_completed(&self, id: &str) {
        for _ in 0..200 {
            if self.engine.status(id) == Some(TaskStatus::Completed) {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("task '{id}' never completed");
    }

    /// Wait until the archive holds a file for `id` and return its content.
    /// The worker archives shortly *after* marking a task completed, so
    /// readers of archived output poll here rather than on the status.
    pub async fn wait_archived(&self, id: &str) -> Vec<u8> {
        for _ in 0..200 {
            if let Ok(Some(content)) = self.archive.read(id).await {
                return content;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("no archived output for task '{id}'");
    }
}

/// Builder for [`EngineHarness`] to simplify test setup.
pub struct EngineHarnessBuilder {
    queue_capacity: usize,
    when_full: WhenFull,
}

impl EngineHarnessBuilder {
    pub fn new() -> Self {
        Self {
            queue_capacity: 8,
            when_full: WhenFull::Wait,
        }
    }

    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity;
        self
    }

    pub fn with_when_full(mut self, when_full: WhenFull) -> Self {
        self.when_full = when_full;
        self
    }

    /// Spawn the engine. Must be called from within a tokio runtime.
    pub fn build(self) -> EngineHarness {
        let temp = TempDir::new().expect("Failed to create temp dir for harness");
        let archive = LogArchive::new(temp.path().join("logs"));
        let runner = Arc::new(FakeRunner::new());

        let engine = spawn_engine(
            self.queue_capacity,
            self.when_full,
            Arc::clone(&runner) as Arc<dyn ScriptRunner>,
            archive.clone(),
        );

        EngineHarness {
            engine,
            runner,
            archive,
            temp,
        }
    }
}

impl Default for EngineHarnessBuilder {
    fn default() -> Self {
        Self::new()
    }
}
