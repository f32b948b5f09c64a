//! Requirements analysis stage.

use super::{parse, Stage};
use crate::client::{GenerationClient, GenerationOptions};
use crate::core::{ArtifactSet, RequirementsSpec, StageArtifact, StageKind};
use crate::errors::GenflowError;
use crate::prompts::PromptRegistry;
use async_trait::async_trait;
use std::sync::Arc;

/// Turns the raw project request into a [`RequirementsSpec`].
#[derive(Debug)]
pub struct RequirementsStage {
    client: GenerationClient,
    prompts: Arc<PromptRegistry>,
    options: GenerationOptions,
}

impl RequirementsStage {
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
impl Stage for RequirementsStage {
    fn kind(&self) -> StageKind {
        StageKind::Requirements
    }

    async fn run(&self, prior: &ArtifactSet) -> Result<StageArtifact, GenflowError> {
        let kind = self.kind();
        let template = self.prompts.get(kind, kind.operation_key())?;

        let text = self
            .client
            .generate(template, prior.brief(), &self.options)
            .await?;

        let spec: RequirementsSpec = parse::parse_stage_output(kind, &text)?;
        Ok(StageArtifact::Requirements(spec))
    }
}
