mod common;
use crate::common::init_tracing;

use std::error::Error;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use tempfile::TempDir;

use scriptq::engine::Task;
use scriptq::exec::{ProcessRunner, RunOutcome, ScriptRunner};

type TestResult = Result<(), Box<dyn Error>>;

/// Write a shell script into `dir` and return its path. The runner invokes
/// `sh <path>`, so no executable bit is needed.
fn write_script(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).expect("write test script");
    path
}

fn buffer_string(task: &Task) -> String {
    String::from_utf8_lossy(&task.buffer.lock().unwrap()).into_owned()
}

#[tokio::test]
async fn captures_stdout_and_stderr_into_one_buffer() -> TestResult {
    crate::common::with_timeout(async {
        init_tracing();

        let dir = TempDir::new()?;
        let script = write_script(&dir, "both.sh", "echo to-stdout\necho to-stderr 1>&2\n");

        let runner = ProcessRunner::new("sh");
        let task = Task::new("both.sh", script);

        let outcome = runner.run(task.clone()).await?;
        assert_eq!(outcome, RunOutcome::Exited(0));

        let output = buffer_string(&task);
        assert!(output.contains("to-stdout"), "missing stdout in: {output:?}");
        assert!(output.contains("to-stderr"), "missing stderr in: {output:?}");

        Ok(())
    })
    .await
}

#[tokio::test]
async fn reports_nonzero_exit_codes() -> TestResult {
    crate::common::with_timeout(async {
        init_tracing();

        let dir = TempDir::new()?;
        let script = write_script(&dir, "fail.sh", "exit 3\n");

        let runner = ProcessRunner::new("sh");
        let outcome = runner.run(Task::new("fail.sh", script)).await?;
        assert_eq!(outcome, RunOutcome::Exited(3));

        Ok(())
    })
    .await
}

#[tokio::test]
async fn cancellation_kills_a_running_process() -> TestResult {
    crate::common::with_timeout(async {
        init_tracing();

        let dir = TempDir::new()?;
        let script = write_script(&dir, "slow.sh", "echo begun\nsleep 30\n");

        let runner = ProcessRunner::new("sh");
        let task = Task::new("slow.sh", script);

        let run_task = task.clone();
        let run = tokio::spawn(async move { runner.run(run_task).await });

        // Wait until the script is demonstrably running.
        for _ in 0..200 {
            if buffer_string(&task).contains("begun") {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert!(buffer_string(&task).contains("begun"));

        task.cancel.cancel();

        // Far before the scripted 30s sleep would have elapsed.
        let outcome = run.await??;
        assert_eq!(outcome, RunOutcome::Canceled);

        Ok(())
    })
    .await
}

#[tokio::test]
async fn cancelled_before_start_never_spawns_a_process() -> TestResult {
    crate::common::with_timeout(async {
        init_tracing();

        let dir = TempDir::new()?;
        let marker = dir.path().join("marker");
        let script = write_script(
            &dir,
            "mark.sh",
            &format!("touch '{}'\n", marker.display()),
        );

        let runner = ProcessRunner::new("sh");
        let task = Task::new("mark.sh", script);
        task.cancel.cancel();

        let outcome = runner.run(task.clone()).await?;
        assert_eq!(outcome, RunOutcome::Canceled);

        // No process, no side effects, no output.
        assert!(!marker.exists());
        assert!(task.buffer.lock().unwrap().is_empty());

        Ok(())
    })
    .await
}

#[tokio::test]
async fn missing_interpreter_is_a_launch_error() -> TestResult {
    crate::common::with_timeout(async {
        init_tracing();

        let dir = TempDir::new()?;
        let script = write_script(&dir, "noop.sh", "true\n");

        let runner = ProcessRunner::new("scriptq-no-such-interpreter");
        let err = runner
            .run(Task::new("noop.sh", script))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("spawning"), "got: {err}");

        Ok(())
    })
    .await
}
