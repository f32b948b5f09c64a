//! Stage trait and the four pipeline stage variants.
//!
//! A stage is a pure transformation from the accumulated artifact set to
//! its own artifact: prompt lookup, prior-artifact serialization, one
//! generation call, typed parse. Stages hold no run-scoped state — all run
//! state lives in the coordinator's run record, which keeps every stage
//! independently testable.

mod architecture;
mod implementation;
mod parse;
mod qa;
mod requirements;

pub use architecture::ArchitectureStage;
pub use implementation::ImplementationStage;
pub use qa::QaStage;
pub use requirements::RequirementsStage;

use crate::client::GenerationClient;
use crate::core::{ArtifactSet, StageArtifact, StageKind};
use crate::errors::GenflowError;
use crate::prompts::PromptRegistry;
use async_trait::async_trait;
use std::fmt::Debug;
use std::sync::Arc;

/// Static configuration describing one stage's place in the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageDescriptor {
    /// The stage's identity.
    pub kind: StageKind,
    /// Zero-based position in the pipeline.
    pub ordinal: usize,
    /// Registry operation key for the stage's primary prompt.
    pub operation: &'static str,
    /// Whether failure aborts the run. True for all four stages; no stage
    /// may be skipped.
    pub fatal: bool,
}

impl StageDescriptor {
    /// The descriptor for a stage kind.
    #[must_use]
    pub fn of(kind: StageKind) -> Self {
        Self {
            kind,
            ordinal: kind.ordinal(),
            operation: kind.operation_key(),
            fatal: true,
        }
    }
}

/// Trait for pipeline stages.
#[async_trait]
pub trait Stage: Send + Sync + Debug {
    /// The stage's identity.
    fn kind(&self) -> StageKind;

    /// The stage's static descriptor.
    fn descriptor(&self) -> StageDescriptor {
        StageDescriptor::of(self.kind())
    }

    /// Executes the stage against the accumulated artifact set.
    ///
    /// # Errors
    ///
    /// Backend failures, parse failures, missing prompts, and missing
    /// prerequisite artifacts all propagate; the coordinator turns them
    /// into the run's terminal failure.
    async fn run(&self, prior: &ArtifactSet) -> Result<StageArtifact, GenflowError>;
}

/// Builds the four stages in pipeline order, sharing one client and one
/// prompt registry.
#[must_use]
pub fn default_stages(
    client: GenerationClient,
    prompts: Arc<PromptRegistry>,
) -> Vec<Arc<dyn Stage>> {
    vec![
        Arc::new(RequirementsStage::new(client.clone(), prompts.clone())),
        Arc::new(ArchitectureStage::new(client.clone(), prompts.clone())),
        Arc::new(ImplementationStage::new(client.clone(), prompts.clone())),
        Arc::new(QaStage::new(client, prompts)),
    ]
}
