//! Progress event type consumed by progress sinks.

use super::{ProgressPhase, StageKind};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// An immutable progress record emitted by the coordinator.
///
/// Events for a given run carry strictly increasing sequence numbers so a
/// transport that can reorder or duplicate delivery stays detectable
/// downstream. Consumers must not reorder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressEvent {
    /// The run this event belongs to.
    pub run_id: Uuid,

    /// Per-run sequence number, stamped by the coordinator at emission.
    pub sequence: u64,

    /// The stage the event refers to, absent for run-level events.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stage: Option<StageKind>,

    /// The progress phase the run is in.
    pub phase: ProgressPhase,

    /// Human-readable summary of what happened.
    pub message: String,

    /// Overall run progress in `[0, 1]`.
    pub progress: f64,

    /// Additional event data.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, serde_json::Value>,

    /// When the event was emitted (ISO 8601).
    pub timestamp: String,
}

impl ProgressEvent {
    fn new(run_id: Uuid, phase: ProgressPhase, message: impl Into<String>, progress: f64) -> Self {
        Self {
            run_id,
            sequence: 0,
            stage: None,
            phase,
            message: message.into(),
            progress,
            metadata: HashMap::new(),
            timestamp: crate::utils::iso_timestamp(),
        }
    }

    /// Creates the event marking a run as queued.
    #[must_use]
    pub fn queued(run_id: Uuid) -> Self {
        Self::new(run_id, ProgressPhase::Queued, "Run queued", 0.0)
    }

    /// Creates the event marking a stage as started.
    #[must_use]
    pub fn stage_started(run_id: Uuid, stage: StageKind, progress: f64) -> Self {
        let mut event = Self::new(run_id, stage.phase(), stage.summary(), progress);
        event.stage = Some(stage);
        event
    }

    /// Creates the event marking a stage as completed.
    #[must_use]
    pub fn stage_completed(run_id: Uuid, stage: StageKind, progress: f64) -> Self {
        let mut event = Self::new(
            run_id,
            stage.phase(),
            format!("{} complete", stage.summary()),
            progress,
        );
        event.stage = Some(stage);
        event
    }

    /// Creates the terminal event for a completed run.
    #[must_use]
    pub fn completed(run_id: Uuid) -> Self {
        Self::new(run_id, ProgressPhase::Completed, "Generation complete", 1.0)
    }

    /// Creates the terminal event for a failed run.
    ///
    /// The message always carries the human-readable cause.
    #[must_use]
    pub fn failed(run_id: Uuid, stage: Option<StageKind>, error: &str, progress: f64) -> Self {
        let mut event = Self::new(run_id, ProgressPhase::Error, error, progress);
        event.stage = stage;
        event
    }

    /// Sets the sequence number.
    #[must_use]
    pub fn with_sequence(mut self, sequence: u64) -> Self {
        self.sequence = sequence;
        self
    }

    /// Adds a metadata field.
    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }
}
