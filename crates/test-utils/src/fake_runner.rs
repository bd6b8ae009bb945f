use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::Notify;

use scriptq::engine::Task;
use scriptq::errors::Result;
use scriptq::exec::{RunOutcome, ScriptRunner};

/// Scripted behaviour for one task id.
#[derive(Debug, Clone)]
pub enum FakeBehaviour {
    /// Finish immediately with the given outcome.
    Finish(RunOutcome),
    /// Stay "running" until the test calls [`FakeRunner::release`] for this
    /// id (or the task is cancelled), then finish with exit code 0.
    HoldUntilReleased,
    /// Fail as if the process could not be launched.
    LaunchError(String),
}

/// A `ScriptRunner` that never spawns real processes.
///
/// - records the order in which tasks actually started
/// - writes one deterministic line into each started task's buffer
/// - honors cancellation exactly like the real runner: a task cancelled
///   before its turn never starts at all
pub struct FakeRunner {
    started: Mutex<Vec<String>>,
    behaviours: Mutex<HashMap<String, FakeBehaviour>>,
    gates: Mutex<HashMap<String, Arc<Notify>>>,
}

impl FakeRunner {
    pub fn new() -> Self {
        FakeRunner {
            started: Mutex::new(Vec::new()),
            behaviours: Mutex::new(HashMap::new()),
            gates: Mutex::new(HashMap::new()),
        }
    }

    /// Script what `run` does for `id`. Unscripted ids finish with exit
    /// code 0.
    pub fn set_behaviour(&self, id: &str, behaviour: FakeBehaviour) {
        self.behaviours
            .lock()
            .unwrap()
            .insert(id.to_string(), behaviour);
    }

    /// Let a [`FakeBehaviour::HoldUntilReleased`] task finish. Safe to call
    /// before the task has even started; the release is remembered.
    pub fn release(&self, id: &str) {
        self.gate(id).notify_one();
    }

    /// Ids of tasks whose run actually began, in start order.
    pub fn started(&self) -> Vec<String> {
        self.started.lock().unwrap().clone()
    }

    /// Expected buffer content for a started task.
    pub fn output_for(id: &str) -> Vec<u8> {
        format!("ran {id}\n").into_bytes()
    }

    /// Wait until the runner has started `id`. Panics after ~2 seconds so a
    /// wedged worker fails the test instead of hanging it.
    pub async fn wait_started(&self, id: &str) {
        for _ in 0..200 {
            if self.started.lock().unwrap().iter().any(|t| t == id) {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("task '{id}' was never started");
    }

    fn gate(&self, id: &str) -> Arc<Notify> {
        let mut gates = self.gates.lock().unwrap();
        Arc::clone(gates.entry(id.to_string()).or_default())
    }
}

impl Default for FakeRunner {
    fn default() -> Self {
        FakeRunner::new()
    }
}

impl ScriptRunner for FakeRunner {
    fn run(&self, task: Task) -> Pin<Box<dyn Future<Output = Result<RunOutcome>> + Send + '_>> {
        Box::pin(async move {
            // Same contract as the real runner: a token that fired before
            // launch means nothing runs and nothing is written.
            if task.cancel.is_cancelled() {
                return Ok(RunOutcome::Canceled);
            }

            {
                let mut guard = self.started.lock().unwrap();
                guard.push(task.id.clone());
            }
            task.buffer
                .lock()
                .unwrap()
                .extend_from_slice(&Self::output_for(&task.id));

            let behaviour = self
                .behaviours
                .lock()
                .unwrap()
                .get(&task.id)
                .cloned()
                .unwrap_or(FakeBehaviour::Finish(RunOutcome::Exited(0)));

            match behaviour {
                FakeBehaviour::Finish(outcome) => Ok(outcome),
                FakeBehaviour::LaunchError(msg) => Err(anyhow::anyhow!(msg).into()),
                FakeBehaviour::HoldUntilReleased => {
                    let gate = self.gate(&task.id);
                    tokio::select! {
                        _ = gate.notified() => Ok(RunOutcome::Exited(0)),
                        _ = task.cancel.cancelled() => Ok(RunOutcome::Canceled),
                    }
                }
            }
        })
    }
}
