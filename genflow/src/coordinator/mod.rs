//! Pipeline coordinator: the per-run state machine.
//!
//! The coordinator owns the fixed stage sequence and all per-run state.
//! Each run executes on its own driver task; stages within a run are
//! strictly sequential, runs are independent of each other. The run record
//! is mutated only by its driver task, so readers always see a consistent
//! snapshot without holding up execution.

mod config;
mod integration_tests;
mod run;

pub use config::CoordinatorConfig;
pub use run::RunSnapshot;

use crate::core::{ArtifactSet, ProgressEvent, RunStatus};
use crate::errors::GenflowError;
use crate::events::ProgressSink;
use crate::stages::Stage;
use dashmap::DashMap;
use run::RunHandle;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{info, warn};
use uuid::Uuid;

/// Drives project generation runs through the stage pipeline.
///
/// `start_run` gives no idempotency guarantee: every call creates a fresh
/// run, and preventing duplicate runs for one project is the caller's
/// responsibility. Each run id is driven by exactly one task.
pub struct Coordinator {
    stages: Vec<Arc<dyn Stage>>,
    sink: Arc<dyn ProgressSink>,
    permits: Arc<Semaphore>,
    runs: DashMap<Uuid, Arc<RunHandle>>,
}

impl Coordinator {
    /// Creates a coordinator over the given stages.
    ///
    /// Stages execute in the order given; build them with
    /// [`default_stages`](crate::stages::default_stages) for the standard
    /// pipeline.
    #[must_use]
    pub fn new(
        stages: Vec<Arc<dyn Stage>>,
        sink: Arc<dyn ProgressSink>,
        config: CoordinatorConfig,
    ) -> Self {
        Self {
            stages,
            sink,
            permits: Arc::new(Semaphore::new(config.max_concurrent_runs.max(1))),
            runs: DashMap::new(),
        }
    }

    /// Number of stages in the pipeline.
    #[must_use]
    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    /// Starts a run for a project and returns its id.
    ///
    /// The run executes on its own task; progress is observable through
    /// [`run_status`](Self::run_status) and the progress sink. Must be
    /// called within a tokio runtime.
    pub fn start_run(&self, project_id: Uuid, request_text: impl Into<String>) -> Uuid {
        let run_id = crate::utils::generate_uuid();
        let handle = Arc::new(RunHandle::new(run_id, project_id, request_text.into()));
        self.runs.insert(run_id, handle.clone());

        let driver = RunDriver {
            stages: self.stages.clone(),
            sink: self.sink.clone(),
            permits: self.permits.clone(),
            handle,
        };
        tokio::spawn(driver.drive());

        run_id
    }

    /// A read-only snapshot of a run's state.
    #[must_use]
    pub fn run_status(&self, run_id: Uuid) -> Option<RunSnapshot> {
        self.runs.get(&run_id).map(|handle| handle.snapshot())
    }

    /// The artifacts a run has committed so far.
    #[must_use]
    pub fn run_artifacts(&self, run_id: Uuid) -> Option<ArtifactSet> {
        self.runs.get(&run_id).map(|handle| handle.artifacts())
    }

    /// Requests cancellation of a run.
    ///
    /// Takes effect before the next stage starts; an in-flight backend
    /// call completes or times out first. Returns true if the run exists
    /// and had not already reached a terminal state.
    pub fn cancel(&self, run_id: Uuid, reason: impl Into<String>) -> bool {
        match self.runs.get(&run_id) {
            Some(handle) if !handle.is_terminal() => {
                handle.cancel.cancel(reason);
                true
            }
            _ => false,
        }
    }

    /// Waits for a run to reach a terminal state and returns the final
    /// snapshot.
    pub async fn wait(&self, run_id: Uuid) -> Option<RunSnapshot> {
        let handle = self.runs.get(&run_id).map(|entry| entry.value().clone())?;

        loop {
            let notified = handle.done.notified();
            let snapshot = handle.snapshot();
            if snapshot.status.is_terminal() {
                return Some(snapshot);
            }
            notified.await;
        }
    }
}

/// The task-side half of one run: owns the drive loop.
struct RunDriver {
    stages: Vec<Arc<dyn Stage>>,
    sink: Arc<dyn ProgressSink>,
    permits: Arc<Semaphore>,
    handle: Arc<RunHandle>,
}

impl RunDriver {
    async fn drive(self) {
        let run_id = self.handle.snapshot().run_id;

        self.emit(ProgressEvent::queued(run_id)).await;

        // Admission control: the permit is held until the run terminates.
        let Ok(_permit) = self.permits.clone().acquire_owned().await else {
            self.fail(run_id, "coordinator shut down before the run started").await;
            return;
        };

        info!(run_id = %run_id, "run started");
        self.handle.update(|run| run.status = RunStatus::Running);

        let total = self.stages.len();
        for (index, stage) in self.stages.iter().enumerate() {
            if self.check_cancelled(run_id).await {
                return;
            }

            let kind = stage.kind();
            let entry_progress = index as f64 / total as f64;
            self.handle.update(|run| {
                run.current_stage = Some(kind);
                run.stage_progress = 0.0;
                run.message = kind.summary().to_string();
            });
            self.emit(ProgressEvent::stage_started(run_id, kind, entry_progress)).await;

            let prior = self.handle.artifacts();
            let artifact = match stage.run(&prior).await {
                Ok(artifact) => artifact,
                Err(err) => {
                    warn!(run_id = %run_id, stage = %kind, error = %err, "stage failed");
                    self.fail(run_id, &err.to_string()).await;
                    return;
                }
            };

            // The artifact is committed only on stage success, together
            // with the progress advance.
            let exit_progress = (index + 1) as f64 / total as f64;
            let committed = self.handle.update(|run| {
                run.artifacts.insert(artifact).map(|()| {
                    run.overall_progress = exit_progress;
                    run.stage_progress = 1.0;
                    run.message = format!("{} complete", kind.summary());
                })
            });
            if let Err(err) = committed {
                self.fail(run_id, &err.to_string()).await;
                return;
            }
            self.emit(ProgressEvent::stage_completed(run_id, kind, exit_progress)).await;
        }

        // A cancellation that arrived during the final stage still fails
        // the run.
        if self.check_cancelled(run_id).await {
            return;
        }

        self.handle.update(|run| {
            run.status = RunStatus::Completed;
            run.overall_progress = 1.0;
            run.message = "Generation complete".to_string();
        });
        self.emit(ProgressEvent::completed(run_id)).await;
        info!(run_id = %run_id, "run completed");
        self.handle.done.notify_waiters();
    }

    /// Fails the run if cancellation was requested. Returns true when the
    /// run was failed.
    async fn check_cancelled(&self, run_id: Uuid) -> bool {
        if !self.handle.cancel.is_cancelled() {
            return false;
        }
        let reason = self
            .handle
            .cancel
            .reason()
            .unwrap_or_else(|| "cancelled".to_string());
        let err = GenflowError::Cancelled { reason };
        self.fail(run_id, &err.to_string()).await;
        true
    }

    async fn fail(&self, run_id: Uuid, message: &str) {
        self.handle.update(|run| {
            run.status = RunStatus::Failed;
            run.message = message.to_string();
        });

        let snapshot = self.handle.snapshot();
        self.emit(ProgressEvent::failed(
            run_id,
            snapshot.current_stage,
            message,
            snapshot.overall_progress,
        ))
        .await;
        self.handle.done.notify_waiters();
    }

    /// Stamps the event's sequence number and publishes it. Sink failures
    /// lose the notification, never the run.
    async fn emit(&self, event: ProgressEvent) {
        let event = event.with_sequence(self.handle.next_sequence());
        if let Err(err) = self.sink.publish(&event).await {
            warn!(
                run_id = %event.run_id,
                sequence = event.sequence,
                error = %err,
                "failed to publish progress event"
            );
        }
    }
}
