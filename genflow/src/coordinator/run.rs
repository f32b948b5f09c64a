//! Run record, status snapshots, and the per-run handle.

use crate::cancellation::CancelToken;
use crate::core::{ArtifactSet, RunStatus, StageKind};
use crate::utils::Timestamp;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tokio::sync::Notify;
use uuid::Uuid;

/// The mutable state of one pipeline execution.
///
/// Mutated only by the driver task that owns the run; everyone else reads
/// through [`RunSnapshot`]s.
#[derive(Debug, Clone)]
pub(crate) struct Run {
    pub(crate) run_id: Uuid,
    pub(crate) project_id: Uuid,
    pub(crate) status: RunStatus,
    pub(crate) current_stage: Option<StageKind>,
    pub(crate) overall_progress: f64,
    pub(crate) stage_progress: f64,
    pub(crate) message: String,
    pub(crate) last_update: Timestamp,
    pub(crate) artifacts: ArtifactSet,
    pub(crate) sequence: u64,
}

impl Run {
    fn new(run_id: Uuid, project_id: Uuid, brief: String) -> Self {
        Self {
            run_id,
            project_id,
            status: RunStatus::Queued,
            current_stage: None,
            overall_progress: 0.0,
            stage_progress: 0.0,
            message: "Run queued".to_string(),
            last_update: crate::utils::now(),
            artifacts: ArtifactSet::new(brief),
            sequence: 0,
        }
    }
}

/// A read-only view of a run's state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSnapshot {
    /// The run's id.
    pub run_id: Uuid,
    /// The project the run belongs to.
    pub project_id: Uuid,
    /// Lifecycle status.
    pub status: RunStatus,
    /// The stage currently (or last) executing.
    pub current_stage: Option<StageKind>,
    /// Overall run progress in `[0, 1]`.
    pub overall_progress: f64,
    /// Progress of the current stage in `[0, 1]`.
    pub stage_progress: f64,
    /// Human-readable status message.
    pub message: String,
    /// When the run state last changed.
    pub last_update: Timestamp,
}

/// Shared handle to one run: the record, its cancellation token, and a
/// notifier fired on terminal transitions.
#[derive(Debug)]
pub(crate) struct RunHandle {
    record: RwLock<Run>,
    pub(crate) cancel: CancelToken,
    pub(crate) done: Notify,
}

impl RunHandle {
    pub(crate) fn new(run_id: Uuid, project_id: Uuid, brief: String) -> Self {
        Self {
            record: RwLock::new(Run::new(run_id, project_id, brief)),
            cancel: CancelToken::new(),
            done: Notify::new(),
        }
    }

    /// Takes a consistent snapshot of the record.
    pub(crate) fn snapshot(&self) -> RunSnapshot {
        let run = self.record.read();
        RunSnapshot {
            run_id: run.run_id,
            project_id: run.project_id,
            status: run.status,
            current_stage: run.current_stage,
            overall_progress: run.overall_progress,
            stage_progress: run.stage_progress,
            message: run.message.clone(),
            last_update: run.last_update,
        }
    }

    /// Clones the accumulated artifacts.
    pub(crate) fn artifacts(&self) -> ArtifactSet {
        self.record.read().artifacts.clone()
    }

    /// Returns true if the run reached a terminal status.
    pub(crate) fn is_terminal(&self) -> bool {
        self.record.read().status.is_terminal()
    }

    /// Mutates the record and stamps the update time. Driver task only.
    pub(crate) fn update<R>(&self, f: impl FnOnce(&mut Run) -> R) -> R {
        let mut run = self.record.write();
        let result = f(&mut run);
        run.last_update = crate::utils::now();
        result
    }

    /// Hands out the next event sequence number.
    pub(crate) fn next_sequence(&self) -> u64 {
        let mut run = self.record.write();
        let sequence = run.sequence;
        run.sequence += 1;
        sequence
    }
}
