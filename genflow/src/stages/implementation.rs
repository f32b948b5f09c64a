//! Code implementation stage.

use super::{parse, Stage};
use crate::client::{GenerationClient, GenerationOptions};
use crate::core::{ArtifactSet, CodeBundle, StageArtifact, StageKind};
use crate::errors::GenflowError;
use crate::prompts::PromptRegistry;
use async_trait::async_trait;
use std::sync::Arc;

/// Turns the architecture plan into a [`CodeBundle`].
///
/// The requirements specification is included in the user content as
/// context; the plan alone loses the feature-level detail.
#[derive(Debug)]
pub struct ImplementationStage {
    client: GenerationClient,
    prompts: Arc<PromptRegistry>,
    options: GenerationOptions,
}

impl ImplementationStage {
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
impl Stage for ImplementationStage {
    fn kind(&self) -> StageKind {
        StageKind::Implementation
    }

    async fn run(&self, prior: &ArtifactSet) -> Result<StageArtifact, GenflowError> {
        let kind = self.kind();
        let template = self.prompts.get(kind, kind.operation_key())?;

        let requirements = prior
            .requirements()
            .ok_or(GenflowError::MissingArtifact {
                stage: kind,
                missing: StageKind::Requirements,
            })?;
        let plan = prior
            .architecture()
            .ok_or(GenflowError::MissingArtifact {
                stage: kind,
                missing: StageKind::Architecture,
            })?;

        let user_content = serde_json::to_string_pretty(&serde_json::json!({
            "requirements": requirements,
            "architecture": plan,
        }))
        .map_err(|e| GenflowError::Internal(format!("failed to serialize inputs: {e}")))?;

        let text = self
            .client
            .generate(template, &user_content, &self.options)
            .await?;

        let bundle: CodeBundle = parse::parse_stage_output(kind, &text)?;
        if bundle.is_empty() {
            return Err(GenflowError::Parse {
                stage: kind,
                detail: "code bundle contains no files".into(),
            });
        }

        Ok(StageArtifact::Implementation(bundle))
    }
}
