//! Architecture design stage.

use super::{parse, Stage};
use crate::client::{GenerationClient, GenerationOptions};
use crate::core::{ArchitecturePlan, ArtifactSet, StageArtifact, StageKind};
use crate::errors::GenflowError;
use crate::prompts::PromptRegistry;
use async_trait::async_trait;
use std::sync::Arc;

/// Turns the requirements specification into an [`ArchitecturePlan`].
#[derive(Debug)]
pub struct ArchitectureStage {
    client: GenerationClient,
    prompts: Arc<PromptRegistry>,
    options: GenerationOptions,
}

impl ArchitectureStage {
    /// Creates the stage.
    #[must_use]
    pub fn new(client: GenerationClient, prompts: Arc<PromptRegistry>) -> Self {
        Self {
            client,
            prompts,
            options: GenerationOptions::default(),
        }
    }

    /// Overrides the generation options.
    #[must_use]
    pub fn with_options(mut self, options: GenerationOptions) -> Self {
        self.options = options;
        self
    }
}

#[async_trait]
impl Stage for ArchitectureStage {
    fn kind(&self) -> StageKind {
        StageKind::Architecture
    }

    async fn run(&self, prior: &ArtifactSet) -> Result<StageArtifact, GenflowError> {
        let kind = self.kind();
        let template = self.prompts.get(kind, kind.operation_key())?;

        let spec = prior
            .requirements()
            .ok_or(GenflowError::MissingArtifact {
                stage: kind,
                missing: StageKind::Requirements,
            })?;
        let user_content = serde_json::to_string_pretty(spec)
            .map_err(|e| GenflowError::Internal(format!("failed to serialize requirements: {e}")))?;

        let text = self
            .client
            .generate(template, &user_content, &self.options)
            .await?;

        let plan: ArchitecturePlan = parse::parse_stage_output(kind, &text)?;
        Ok(StageArtifact::Architecture(plan))
    }
}
