//! Code review stage.

use super::{parse, Stage};
use crate::client::{GenerationClient, GenerationOptions};
use crate::core::{ArtifactSet, ReviewReport, StageArtifact, StageKind};
use crate::errors::GenflowError;
use crate::prompts::PromptRegistry;
use async_trait::async_trait;
use std::sync::Arc;

/// Reviews the code bundle and produces a [`ReviewReport`].
#[derive(Debug)]
pub struct QaStage {
    client: GenerationClient,
    prompts: Arc<PromptRegistry>,
    options: GenerationOptions,
}

impl QaStage {
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
impl Stage for QaStage {
    fn kind(&self) -> StageKind {
        StageKind::Qa
    }

    async fn run(&self, prior: &ArtifactSet) -> Result<StageArtifact, GenflowError> {
        let kind = self.kind();
        let template = self.prompts.get(kind, kind.operation_key())?;

        let bundle = prior
            .implementation()
            .ok_or(GenflowError::MissingArtifact {
                stage: kind,
                missing: StageKind::Implementation,
            })?;
        let user_content = serde_json::to_string_pretty(bundle)
            .map_err(|e| GenflowError::Internal(format!("failed to serialize code bundle: {e}")))?;

        let text = self
            .client
            .generate(template, &user_content, &self.options)
            .await?;

        let report: ReviewReport = parse::parse_stage_output(kind, &text)?;
        Ok(StageArtifact::Review(report))
    }
}
