//! Stage identity and run status enums.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The four generation stages, in pipeline order.
///
/// The order is fixed and total: every run executes all four stages, each
/// consuming the artifacts of the stages before it. No stage may be skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageKind {
    /// Turns the raw project request into a requirements specification.
    Requirements,
    /// Turns the requirements specification into an architecture plan.
    Architecture,
    /// Turns the architecture plan into a code bundle.
    Implementation,
    /// Reviews the code bundle and produces a review report.
    Qa,
}

impl StageKind {
    /// All stages in execution order.
    pub const ALL: [Self; 4] = [
        Self::Requirements,
        Self::Architecture,
        Self::Implementation,
        Self::Qa,
    ];

    /// The zero-based position of this stage in the pipeline.
    #[must_use]
    pub fn ordinal(self) -> usize {
        match self {
            Self::Requirements => 0,
            Self::Architecture => 1,
            Self::Implementation => 2,
            Self::Qa => 3,
        }
    }

    /// The registry operation key for this stage's primary prompt.
    #[must_use]
    pub fn operation_key(self) -> &'static str {
        match self {
            Self::Requirements => "analyze_requirements",
            Self::Architecture => "design_architecture",
            Self::Implementation => "generate_code",
            Self::Qa => "review_code",
        }
    }

    /// The progress phase a run is in while this stage executes.
    #[must_use]
    pub fn phase(self) -> ProgressPhase {
        match self {
            Self::Requirements => ProgressPhase::Analyzing,
            Self::Architecture => ProgressPhase::Designing,
            Self::Implementation => ProgressPhase::Implementing,
            Self::Qa => ProgressPhase::Reviewing,
        }
    }

    /// A short human-readable description of the work this stage does.
    #[must_use]
    pub fn summary(self) -> &'static str {
        match self {
            Self::Requirements => "Analyzing project requirements",
            Self::Architecture => "Designing application architecture",
            Self::Implementation => "Generating implementation code",
            Self::Qa => "Reviewing generated code",
        }
    }
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Requirements => write!(f, "requirements"),
            Self::Architecture => write!(f, "architecture"),
            Self::Implementation => write!(f, "implementation"),
            Self::Qa => write!(f, "qa"),
        }
    }
}

/// The lifecycle status of a run.
///
/// This is the authoritative machine-readable outcome; the progress phase
/// carried on events is the human-facing vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    /// Created, waiting for an execution slot.
    Queued,
    /// A driver task is executing stages.
    Running,
    /// All stages completed.
    Completed,
    /// A stage failed or the run was cancelled.
    Failed,
}

impl Default for RunStatus {
    fn default() -> Self {
        Self::Queued
    }
}

impl RunStatus {
    /// Returns true if the run can no longer change state.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Queued => write!(f, "queued"),
            Self::Running => write!(f, "running"),
            Self::Completed => write!(f, "completed"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// The phase vocabulary carried on progress events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressPhase {
    /// Waiting for an execution slot.
    Queued,
    /// Requirements analysis in progress or complete.
    Analyzing,
    /// Architecture design in progress or complete.
    Designing,
    /// Code generation in progress or complete.
    Implementing,
    /// Code review in progress or complete.
    Reviewing,
    /// The run finished successfully.
    Completed,
    /// The run failed.
    Error,
}

impl fmt::Display for ProgressPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Queued => write!(f, "queued"),
            Self::Analyzing => write!(f, "analyzing"),
            Self::Designing => write!(f, "designing"),
            Self::Implementing => write!(f, "implementing"),
            Self::Reviewing => write!(f, "reviewing"),
            Self::Completed => write!(f, "completed"),
            Self::Error => write!(f, "error"),
        }
    }
}
