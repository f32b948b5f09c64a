//! End-to-end tests for the coordinator state machine.

#[cfg(test)]
mod tests {
    use crate::client::{GenerationClient, JitterStrategy, RetryConfig, ScriptedBackend};
    use crate::coordinator::{Coordinator, CoordinatorConfig};
    use crate::core::{ArtifactSet, ProgressPhase, RunStatus, StageArtifact, StageKind};
    use crate::errors::{BackendError, GenflowError, SinkError};
    use crate::events::{CollectingProgressSink, ProgressSink};
    use crate::prompts::PromptRegistry;
    use crate::stages::{default_stages, Stage};
    use crate::testing::{
        architecture_json, artifact_for, happy_backend, implementation_json, requirements_json,
    };
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::Semaphore;
    use uuid::Uuid;

    /// A stage that produces its fixture artifact after a short delay.
    #[derive(Debug)]
    struct StubStage {
        kind: StageKind,
        delay: Duration,
        tracker: Option<Arc<Tracker>>,
        executed: Arc<AtomicBool>,
    }

    impl StubStage {
        fn new(kind: StageKind) -> Self {
            Self {
                kind,
                delay: Duration::from_millis(1),
                tracker: None,
                executed: Arc::new(AtomicBool::new(false)),
            }
        }

        fn with_tracker(mut self, tracker: Arc<Tracker>) -> Self {
            self.tracker = Some(tracker);
            self
        }
    }

    #[async_trait]
    impl Stage for StubStage {
        fn kind(&self) -> StageKind {
            self.kind
        }

        async fn run(&self, _prior: &ArtifactSet) -> Result<StageArtifact, GenflowError> {
            self.executed.store(true, Ordering::SeqCst);
            if let Some(tracker) = &self.tracker {
                let active = tracker.current.fetch_add(1, Ordering::SeqCst) + 1;
                tracker.max_observed.fetch_max(active, Ordering::SeqCst);
            }
            tokio::time::sleep(self.delay).await;
            if let Some(tracker) = &self.tracker {
                tracker.current.fetch_sub(1, Ordering::SeqCst);
            }
            Ok(artifact_for(self.kind))
        }
    }

    /// A stage that blocks until released, so tests can cancel mid-run
    /// deterministically.
    #[derive(Debug)]
    struct GateStage {
        kind: StageKind,
        entered: Arc<AtomicBool>,
        release: Arc<Semaphore>,
    }

    #[async_trait]
    impl Stage for GateStage {
        fn kind(&self) -> StageKind {
            self.kind
        }

        async fn run(&self, _prior: &ArtifactSet) -> Result<StageArtifact, GenflowError> {
            self.entered.store(true, Ordering::SeqCst);
            let _ = self.release.acquire().await;
            Ok(artifact_for(self.kind))
        }
    }

    #[derive(Debug, Default)]
    struct Tracker {
        current: AtomicUsize,
        max_observed: AtomicUsize,
    }

    struct FailingSink;

    #[async_trait]
    impl ProgressSink for FailingSink {
        async fn publish(
            &self,
            _event: &crate::core::ProgressEvent,
        ) -> Result<(), SinkError> {
            Err(SinkError::Unavailable("datastore offline".into()))
        }
    }

    fn fast_retry() -> RetryConfig {
        RetryConfig::new()
            .with_base_delay_ms(1)
            .with_jitter(JitterStrategy::None)
    }

    fn coordinator_over(
        backend: Arc<ScriptedBackend>,
    ) -> (Coordinator, Arc<CollectingProgressSink>) {
        let client = GenerationClient::new(backend).with_retry_config(fast_retry());
        let stages = default_stages(client, Arc::new(PromptRegistry::new()));
        let sink = Arc::new(CollectingProgressSink::new());
        let coordinator = Coordinator::new(stages, sink.clone(), CoordinatorConfig::default());
        (coordinator, sink)
    }

    fn stub_stages() -> Vec<Arc<dyn Stage>> {
        StageKind::ALL
            .iter()
            .map(|&kind| Arc::new(StubStage::new(kind)) as Arc<dyn Stage>)
            .collect()
    }

    #[tokio::test]
    async fn test_full_pipeline_completes() {
        let backend = Arc::new(happy_backend());
        let (coordinator, sink) = coordinator_over(backend.clone());

        let run_id = coordinator.start_run(Uuid::new_v4(), "Build a todo app");
        let snapshot = coordinator.wait(run_id).await.unwrap();

        assert_eq!(snapshot.status, RunStatus::Completed);
        assert_eq!(snapshot.overall_progress, 1.0);
        assert_eq!(snapshot.current_stage, Some(StageKind::Qa));
        assert_eq!(backend.call_count(), 4);

        let artifacts = coordinator.run_artifacts(run_id).unwrap();
        assert_eq!(artifacts.len(), 4);
        assert!(artifacts.review().is_some());

        // queued + four started/completed pairs + terminal.
        let events = sink.events_for(run_id);
        assert_eq!(events.len(), 10);
        assert_eq!(events[0].phase, ProgressPhase::Queued);
        assert_eq!(events[9].phase, ProgressPhase::Completed);
        for (i, event) in events.iter().enumerate() {
            assert_eq!(event.sequence, i as u64);
        }
        for pair in events.windows(2) {
            assert!(pair[1].progress >= pair[0].progress);
        }

        // The stage never regresses across the event sequence.
        let mut last_ordinal = 0;
        for event in &events {
            if let Some(stage) = event.stage {
                assert!(stage.ordinal() >= last_ordinal);
                last_ordinal = stage.ordinal();
            }
        }
    }

    #[tokio::test]
    async fn test_fatal_error_fails_run_at_stage() {
        let backend = Arc::new(ScriptedBackend::new());
        backend.push_ok(requirements_json());
        backend.push_err(BackendError::Fatal("content policy rejection".into()));

        let (coordinator, sink) = coordinator_over(backend.clone());
        let run_id = coordinator.start_run(Uuid::new_v4(), "Build a todo app");
        let snapshot = coordinator.wait(run_id).await.unwrap();

        assert_eq!(snapshot.status, RunStatus::Failed);
        assert_eq!(snapshot.current_stage, Some(StageKind::Architecture));
        assert!(snapshot.message.contains("content policy rejection"));
        assert!(snapshot.overall_progress < 1.0);

        // No retry of a fatal error: one call per attempted stage.
        assert_eq!(backend.call_count(), 2);

        let artifacts = coordinator.run_artifacts(run_id).unwrap();
        assert!(artifacts.requirements().is_some());
        assert!(artifacts.architecture().is_none());

        let events = sink.events_for(run_id);
        let last = events.last().unwrap();
        assert_eq!(last.phase, ProgressPhase::Error);
        assert_eq!(last.stage, Some(StageKind::Architecture));
    }

    #[tokio::test]
    async fn test_malformed_output_is_parse_failure_without_retry() {
        let backend = Arc::new(ScriptedBackend::new());
        backend.push_ok(requirements_json());
        backend.push_ok(architecture_json());
        backend.push_ok("here is your code: ,,, definitely not JSON");

        let (coordinator, _sink) = coordinator_over(backend.clone());
        let run_id = coordinator.start_run(Uuid::new_v4(), "Build a todo app");
        let snapshot = coordinator.wait(run_id).await.unwrap();

        assert_eq!(snapshot.status, RunStatus::Failed);
        assert_eq!(snapshot.current_stage, Some(StageKind::Implementation));
        // The cause names the parse failure, not the backend.
        assert!(snapshot.message.contains("malformed output"));
        assert!(!snapshot.message.contains("backend"));
        assert_eq!(backend.call_count(), 3);

        let artifacts = coordinator.run_artifacts(run_id).unwrap();
        assert_eq!(artifacts.len(), 2);
        assert!(artifacts.implementation().is_none());
    }

    #[tokio::test]
    async fn test_transient_retries_invisible_to_run_state() {
        let backend = Arc::new(ScriptedBackend::new());
        backend.push_err(BackendError::Transient("rate limited".into()));
        backend.push_ok(requirements_json());
        backend.push_ok(architecture_json());
        backend.push_ok(implementation_json());
        backend.push_ok(crate::testing::qa_json());

        let (coordinator, sink) = coordinator_over(backend.clone());
        let run_id = coordinator.start_run(Uuid::new_v4(), "Build a todo app");
        let snapshot = coordinator.wait(run_id).await.unwrap();

        assert_eq!(snapshot.status, RunStatus::Completed);
        assert_eq!(backend.call_count(), 5);

        // The retried call never surfaces as an event.
        let events = sink.events_for(run_id);
        assert!(events.iter().all(|e| e.phase != ProgressPhase::Error));
        assert_eq!(events.len(), 10);
    }

    #[tokio::test]
    async fn test_concurrent_runs_are_independent() {
        let sink = Arc::new(CollectingProgressSink::new());
        let coordinator = Arc::new(Coordinator::new(
            stub_stages(),
            sink.clone(),
            CoordinatorConfig::default(),
        ));

        let first = coordinator.start_run(Uuid::new_v4(), "Build a todo app");
        let second = coordinator.start_run(Uuid::new_v4(), "Build a chat app");

        let outcomes =
            futures::future::join_all([first, second].map(|id| coordinator.wait(id))).await;
        for outcome in outcomes {
            assert_eq!(outcome.unwrap().status, RunStatus::Completed);
        }

        // Each run's own event sequence is contiguous regardless of how
        // the two runs interleaved in the shared sink.
        for run_id in [first, second] {
            let events = sink.events_for(run_id);
            assert_eq!(events.len(), 10);
            for (i, event) in events.iter().enumerate() {
                assert_eq!(event.sequence, i as u64);
            }
        }
    }

    #[tokio::test]
    async fn test_cancel_between_stages() {
        let entered = Arc::new(AtomicBool::new(false));
        let release = Arc::new(Semaphore::new(0));
        let gate = Arc::new(GateStage {
            kind: StageKind::Requirements,
            entered: entered.clone(),
            release: release.clone(),
        });

        let second = Arc::new(StubStage::new(StageKind::Architecture));
        let second_executed = second.executed.clone();
        let stages: Vec<Arc<dyn Stage>> = vec![
            gate,
            second,
            Arc::new(StubStage::new(StageKind::Implementation)),
            Arc::new(StubStage::new(StageKind::Qa)),
        ];

        let sink = Arc::new(CollectingProgressSink::new());
        let coordinator =
            Coordinator::new(stages, sink.clone(), CoordinatorConfig::default());
        let run_id = coordinator.start_run(Uuid::new_v4(), "Build a todo app");

        while !entered.load(Ordering::SeqCst) {
            tokio::time::sleep(Duration::from_millis(1)).await;
        }

        assert!(coordinator.cancel(run_id, "user closed the project"));
        release.add_permits(1);

        let snapshot = coordinator.wait(run_id).await.unwrap();
        assert_eq!(snapshot.status, RunStatus::Failed);
        assert!(snapshot.message.contains("user closed the project"));

        // The in-flight stage finished and committed; nothing after it ran.
        let artifacts = coordinator.run_artifacts(run_id).unwrap();
        assert!(artifacts.requirements().is_some());
        assert_eq!(artifacts.len(), 1);
        assert!(!second_executed.load(Ordering::SeqCst));

        let last = sink.events_for(run_id).last().cloned().unwrap();
        assert_eq!(last.phase, ProgressPhase::Error);
    }

    #[tokio::test]
    async fn test_sink_failure_does_not_fail_run() {
        let coordinator = Coordinator::new(
            stub_stages(),
            Arc::new(FailingSink),
            CoordinatorConfig::default(),
        );

        let run_id = coordinator.start_run(Uuid::new_v4(), "Build a todo app");
        let snapshot = coordinator.wait(run_id).await.unwrap();

        assert_eq!(snapshot.status, RunStatus::Completed);
        assert_eq!(snapshot.overall_progress, 1.0);
    }

    #[tokio::test]
    async fn test_admission_limit_bounds_concurrency() {
        let tracker = Arc::new(Tracker::default());
        let stages: Vec<Arc<dyn Stage>> = StageKind::ALL
            .iter()
            .map(|&kind| {
                Arc::new(StubStage::new(kind).with_tracker(tracker.clone())) as Arc<dyn Stage>
            })
            .collect();

        let coordinator = Arc::new(Coordinator::new(
            stages,
            Arc::new(CollectingProgressSink::new()),
            CoordinatorConfig::new().with_max_concurrent_runs(1),
        ));

        let runs: Vec<Uuid> = (0..3)
            .map(|i| coordinator.start_run(Uuid::new_v4(), format!("project {i}")))
            .collect();

        for run_id in runs {
            let snapshot = coordinator.wait(run_id).await.unwrap();
            assert_eq!(snapshot.status, RunStatus::Completed);
        }

        assert_eq!(tracker.max_observed.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_unknown_run_id() {
        let (coordinator, _sink) = coordinator_over(Arc::new(ScriptedBackend::new()));

        assert!(coordinator.run_status(Uuid::new_v4()).is_none());
        assert!(coordinator.wait(Uuid::new_v4()).await.is_none());
        assert!(!coordinator.cancel(Uuid::new_v4(), "nothing there"));
    }

    #[tokio::test]
    async fn test_cancel_after_terminal_is_rejected() {
        let coordinator = Coordinator::new(
            stub_stages(),
            Arc::new(CollectingProgressSink::new()),
            CoordinatorConfig::default(),
        );

        let run_id = coordinator.start_run(Uuid::new_v4(), "Build a todo app");
        let snapshot = coordinator.wait(run_id).await.unwrap();
        assert_eq!(snapshot.status, RunStatus::Completed);

        assert!(!coordinator.cancel(run_id, "too late"));
        assert_eq!(
            coordinator.run_status(run_id).unwrap().status,
            RunStatus::Completed
        );
    }
}
