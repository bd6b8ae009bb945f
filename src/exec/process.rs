// src/exec/process.rs

//! The real script runner: one `tokio::process` child per task.

use std::future::Future;
use std::pin::Pin;
use std::process::Stdio;

use anyhow::Context;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::engine::{OutputBuffer, Task};
use crate::errors::Result;

use super::{RunOutcome, ScriptRunner};

/// Runs scripts as `<interpreter> <script_path>` child processes.
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    interpreter: String,
}

impl ProcessRunner {
    pub fn new(interpreter: impl Into<String>) -> Self {
        ProcessRunner {
            interpreter: interpreter.into(),
        }
    }
}

impl ScriptRunner for ProcessRunner {
    fn run(&self, task: Task) -> Pin<Box<dyn Future<Output = Result<RunOutcome>> + Send + '_>> {
        Box::pin(run_script(&self.interpreter, task))
    }
}

async fn run_script(interpreter: &str, task: Task) -> Result<RunOutcome> {
    // Cancellations that land after this check are caught by the select
    // below on its first poll.
    if task.cancel.is_cancelled() {
        info!(task = %task.id, "task cancelled before launch; not spawning a process");
        return Ok(RunOutcome::Canceled);
    }

    info!(
        task = %task.id,
        interpreter = %interpreter,
        script = %task.script_path.display(),
        "starting script process"
    );

    let mut cmd = Command::new(interpreter);
    cmd.arg(&task.script_path)
        // Python buffers heavily when not attached to a tty; force
        // unbuffered UTF-8 output so live status reads see it promptly.
        .env("PYTHONUNBUFFERED", "1")
        .env("PYTHONIOENCODING", "utf-8")
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let mut child = cmd
        .spawn()
        .with_context(|| format!("spawning '{}' for task '{}'", interpreter, task.id))?;

    // Pump both streams into the shared buffer as chunks arrive, so the
    // combined output is available mid-run.
    let stdout_pump = child
        .stdout
        .take()
        .map(|stdout| pump_output(stdout, task.buffer.clone()));
    let stderr_pump = child
        .stderr
        .take()
        .map(|stderr| pump_output(stderr, task.buffer.clone()));

    // Either the process exits on its own (normal case), or the task's
    // cancellation token fires and the process is killed.
    let status = tokio::select! {
        status_res = child.wait() => {
            let status = status_res
                .with_context(|| format!("waiting for process of task '{}'", task.id))?;
            Some(status)
        }

        _ = task.cancel.cancelled() => {
            info!(task = %task.id, "cancellation requested for running task; killing process");
            if let Err(e) = child.kill().await {
                warn!(task = %task.id, error = %e, "failed to kill child process on cancellation");
            }
            None
        }
    };

    // After a normal exit, drain what is left in the pipes so the archived
    // output is complete. After a kill the pipes may be held open by
    // grandchildren of the script, so stop the pumps instead of waiting
    // for an EOF that may never come; a cancelled run's output can be
    // truncated.
    if status.is_none() {
        if let Some(pump) = &stdout_pump {
            pump.abort();
        }
        if let Some(pump) = &stderr_pump {
            pump.abort();
        }
    }
    if let Some(pump) = stdout_pump {
        let _ = pump.await;
    }
    if let Some(pump) = stderr_pump {
        let _ = pump.await;
    }

    match status {
        Some(status) => {
            let code = status.code().unwrap_or(-1);
            info!(
                task = %task.id,
                exit_code = code,
                success = status.success(),
                "script process exited"
            );
            Ok(RunOutcome::Exited(code))
        }
        None => Ok(RunOutcome::Canceled),
    }
}

/// Copy raw chunks from a child pipe into the task's shared buffer.
fn pump_output<R>(reader: R, buffer: OutputBuffer) -> JoinHandle<()>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut reader = reader;
        let mut chunk = [0u8; 8192];

        loop {
            match reader.read(&mut chunk).await {
                Ok(0) => break,
                Ok(n) => {
                    buffer.lock().unwrap().extend_from_slice(&chunk[..n]);
                }
                Err(err) => {
                    debug!(error = %err, "stopped reading child output pipe");
                    break;
                }
            }
        }
    })
}
