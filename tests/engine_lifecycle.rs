mod common;
use crate::common::init_tracing;

use std::error::Error;
use std::time::Duration;

use tokio::time::timeout;

use scriptq::engine::{SubmitOutcome, TaskStatus, WhenFull};
use scriptq_test_utils::fake_runner::FakeBehaviour;
use scriptq_test_utils::harness::EngineHarnessBuilder;

type TestResult = Result<(), Box<dyn Error>>;

#[tokio::test]
async fn tasks_run_one_at_a_time_in_submission_order() -> TestResult {
    crate::common::with_timeout(async {
        init_tracing();

        let h = EngineHarnessBuilder::new().build();
        h.runner.set_behaviour("a.py", FakeBehaviour::HoldUntilReleased);
        h.runner.set_behaviour("b.py", FakeBehaviour::HoldUntilReleased);
        h.runner.set_behaviour("c.py", FakeBehaviour::HoldUntilReleased);

        assert_eq!(h.submit("a.py").await?, SubmitOutcome::Accepted);
        assert_eq!(h.submit("b.py").await?, SubmitOutcome::Accepted);
        assert_eq!(h.submit("c.py").await?, SubmitOutcome::Accepted);

        // While a.py is held mid-run, nothing else may start.
        h.runner.wait_started("a.py").await;
        assert_eq!(h.runner.started(), vec!["a.py"]);

        h.runner.release("a.py");
        h.runner.wait_started("b.py").await;
        assert_eq!(h.runner.started(), vec!["a.py", "b.py"]);

        h.runner.release("b.py");
        h.runner.wait_started("c.py").await;
        assert_eq!(h.runner.started(), vec!["a.py", "b.py", "c.py"]);

        h.runner.release("c.py");
        h.wait_completed("c.py").await;

        Ok(())
    })
    .await
}

#[tokio::test]
async fn registry_and_current_slot_track_lifecycle() -> TestResult {
    crate::common::with_timeout(async {
        init_tracing();

        let h = EngineHarnessBuilder::new().build();
        h.runner.set_behaviour("a.py", FakeBehaviour::HoldUntilReleased);

        h.submit("a.py").await?;
        h.submit("b.py").await?;
        h.runner.wait_started("a.py").await;

        assert_eq!(h.engine.status("a.py"), Some(TaskStatus::Running));
        assert_eq!(h.engine.status("b.py"), Some(TaskStatus::Queued));
        assert_eq!(h.engine.current_id(), Some("a.py".to_string()));

        let mut active = h.engine.list_active();
        active.sort_by(|x, y| x.id.cmp(&y.id));
        let ids: Vec<_> = active.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["a.py", "b.py"]);
        assert_eq!(active[0].status, TaskStatus::Running);
        assert_eq!(active[1].status, TaskStatus::Queued);

        h.runner.release("a.py");

        // Archiving happens after the current slot is cleared, so once both
        // logs exist the engine must read as idle.
        h.wait_archived("a.py").await;
        h.wait_archived("b.py").await;

        assert_eq!(h.engine.status("a.py"), Some(TaskStatus::Completed));
        assert_eq!(h.engine.status("b.py"), Some(TaskStatus::Completed));
        assert_eq!(h.engine.current_id(), None);
        assert!(h.engine.list_active().is_empty());

        Ok(())
    })
    .await
}

#[tokio::test]
async fn completed_output_is_archived_per_task() -> TestResult {
    crate::common::with_timeout(async {
        init_tracing();

        let h = EngineHarnessBuilder::new().build();
        h.submit("a.py").await?;

        let content = h.wait_archived("a.py").await;
        assert_eq!(content, scriptq_test_utils::fake_runner::FakeRunner::output_for("a.py"));

        Ok(())
    })
    .await
}

#[tokio::test]
async fn resubmitting_same_id_replaces_registry_record() -> TestResult {
    crate::common::with_timeout(async {
        init_tracing();

        let h = EngineHarnessBuilder::new().build();
        h.runner.set_behaviour("a.py", FakeBehaviour::HoldUntilReleased);

        h.submit("a.py").await?;
        h.runner.wait_started("a.py").await;
        assert_eq!(h.engine.status("a.py"), Some(TaskStatus::Running));

        // A second upload of the same name creates a fresh queued record
        // that overwrites the running one: last write wins.
        h.submit("a.py").await?;
        assert_eq!(h.engine.status("a.py"), Some(TaskStatus::Queued));

        h.runner.release("a.py");

        // The second instance starts once the first finishes.
        for _ in 0..200 {
            if h.runner.started().len() == 2 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert_eq!(h.runner.started(), vec!["a.py", "a.py"]);

        h.runner.release("a.py");
        h.wait_completed("a.py").await;

        Ok(())
    })
    .await
}

#[tokio::test]
async fn runner_failure_completes_task_and_keeps_worker_alive() -> TestResult {
    crate::common::with_timeout(async {
        init_tracing();

        let h = EngineHarnessBuilder::new().build();
        h.runner.set_behaviour(
            "broken.py",
            FakeBehaviour::LaunchError("no such interpreter".to_string()),
        );

        h.submit("broken.py").await?;
        h.submit("b.py").await?;

        // The failed task still completes, with the failure evidence in its
        // archived output.
        let broken_log = h.wait_archived("broken.py").await;
        let broken_log = String::from_utf8(broken_log)?;
        assert!(broken_log.contains("script execution error"));
        assert!(broken_log.contains("no such interpreter"));
        assert_eq!(h.engine.status("broken.py"), Some(TaskStatus::Completed));

        // And the worker moves on to the next task.
        h.wait_archived("b.py").await;
        assert_eq!(h.engine.status("b.py"), Some(TaskStatus::Completed));

        Ok(())
    })
    .await
}

#[tokio::test]
async fn wait_policy_parks_submitter_until_slot_frees() -> TestResult {
    crate::common::with_timeout(async {
        init_tracing();

        let h = EngineHarnessBuilder::new()
            .with_queue_capacity(1)
            .with_when_full(WhenFull::Wait)
            .build();
        h.runner.set_behaviour("a.py", FakeBehaviour::HoldUntilReleased);
        h.runner.set_behaviour("b.py", FakeBehaviour::HoldUntilReleased);

        h.submit("a.py").await?;
        h.runner.wait_started("a.py").await;

        // a.py was dequeued, so b.py takes the single queue slot.
        assert_eq!(h.submit("b.py").await?, SubmitOutcome::Accepted);

        // c.py has nowhere to go; its submission must park.
        let engine = h.engine.clone();
        let path = h.script_path("c.py");
        let mut parked = tokio::spawn(async move { engine.submit("c.py", path).await });
        assert!(
            timeout(Duration::from_millis(100), &mut parked).await.is_err(),
            "submit should still be waiting for a queue slot"
        );

        // Finishing a.py lets the worker dequeue b.py, freeing the slot.
        h.runner.release("a.py");
        let outcome = parked.await??;
        assert_eq!(outcome, SubmitOutcome::Accepted);

        h.runner.release("b.py");
        h.wait_completed("c.py").await;

        Ok(())
    })
    .await
}

#[tokio::test]
async fn reject_policy_turns_away_overflow_without_creating_a_task() -> TestResult {
    crate::common::with_timeout(async {
        init_tracing();

        let h = EngineHarnessBuilder::new()
            .with_queue_capacity(1)
            .with_when_full(WhenFull::Reject)
            .build();
        h.runner.set_behaviour("a.py", FakeBehaviour::HoldUntilReleased);

        h.submit("a.py").await?;
        h.runner.wait_started("a.py").await;
        assert_eq!(h.submit("b.py").await?, SubmitOutcome::Accepted);

        // Queue slot taken by b.py; c.py is turned away and leaves no trace.
        assert_eq!(h.submit("c.py").await?, SubmitOutcome::QueueFull);
        assert_eq!(h.engine.status("c.py"), None);

        h.runner.release("a.py");
        h.wait_completed("b.py").await;
        assert_eq!(h.engine.status("c.py"), None);

        Ok(())
    })
    .await
}
