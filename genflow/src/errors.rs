//! Error types for the genflow pipeline.
//!
//! The taxonomy separates errors by how the coordinator must react to them:
//! transient backend failures are retried inside the generation client,
//! everything else fails the run it occurred in.

use crate::core::StageKind;
use thiserror::Error;

/// Error returned by a generation backend call.
#[derive(Debug, Clone, Error)]
pub enum BackendError {
    /// Network failure, timeout, or rate limit. Eligible for retry with
    /// backoff inside the generation client.
    #[error("transient backend error: {0}")]
    Transient(String),

    /// Malformed request, authentication failure, or content-policy
    /// rejection. Never retried.
    #[error("fatal backend error: {0}")]
    Fatal(String),
}

impl BackendError {
    /// Returns true if the error is eligible for retry.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transient(_))
    }

    /// Returns true if the error must not be retried.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Fatal(_))
    }
}

/// Error returned by a progress sink publish.
///
/// Sink failures are non-fatal to the run: the coordinator logs them and
/// continues, losing only the individual notification.
#[derive(Debug, Clone, Error)]
pub enum SinkError {
    /// The sink's transport or store rejected the event.
    #[error("progress sink unavailable: {0}")]
    Unavailable(String),
}

/// The main error type for genflow operations.
#[derive(Debug, Error)]
pub enum GenflowError {
    /// The generation backend failed, either fatally or after retries
    /// were exhausted.
    #[error("{0}")]
    Backend(#[from] BackendError),

    /// A stage received a well-formed response that fails its structural
    /// validation. Not retried: the same prompt against the same model is
    /// unlikely to self-correct.
    #[error("{stage} stage produced malformed output: {detail}")]
    Parse {
        /// The stage whose output failed validation.
        stage: StageKind,
        /// What failed to parse.
        detail: String,
    },

    /// No template registered for a (stage, operation) pair. A
    /// configuration error; fails the run immediately with no retry.
    #[error("no prompt registered for {kind}/{operation}")]
    PromptNotFound {
        /// The stage the lookup was for.
        kind: StageKind,
        /// The operation key that was missing.
        operation: String,
    },

    /// A stage was invoked without the prior artifact it consumes.
    #[error("{stage} stage requires the {missing} artifact, which is not present")]
    MissingArtifact {
        /// The stage that was invoked.
        stage: StageKind,
        /// The prerequisite stage whose artifact is absent.
        missing: StageKind,
    },

    /// The run was cancelled between stages.
    #[error("run cancelled: {reason}")]
    Cancelled {
        /// The cancellation reason (first one wins).
        reason: String,
    },

    /// A generic internal error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl GenflowError {
    /// Returns true if this error is a cancellation.
    #[must_use]
    pub fn is_cancellation(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }
}
