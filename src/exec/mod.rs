// src/exec/mod.rs

//! Script process execution layer.
//!
//! This module is responsible for actually running uploaded scripts, using
//! `tokio::process::Command`, and capturing their combined output into the
//! task's shared buffer.
//!
//! - [`ScriptRunner`] is the trait the worker drives; tests can replace it
//!   with a fake implementation that never spawns processes.
//! - [`process`] provides the concrete [`ProcessRunner`] used in
//!   production.

pub mod process;

pub use process::ProcessRunner;

use std::future::Future;
use std::pin::Pin;

use crate::engine::Task;
use crate::errors::Result;

/// How a single run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The process ran and exited with the given code (zero or not).
    Exited(i32),
    /// The task's cancellation token fired: either before launch (no
    /// process was spawned) or mid-run (the process was killed).
    Canceled,
}

/// Strategy for turning a task into an actual run.
///
/// Implementations must:
/// - honor `task.cancel` both before launch and while the run is in
///   flight,
/// - append everything the script writes (stdout and stderr alike) to
///   `task.buffer` as it appears.
///
/// Failing to launch at all is reported as an error, not an outcome.
pub trait ScriptRunner: Send + Sync + 'static {
    fn run(&self, task: Task) -> Pin<Box<dyn Future<Output = Result<RunOutcome>> + Send + '_>>;
}
