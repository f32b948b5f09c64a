//! Generation backend trait and per-call options.

use crate::errors::BackendError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Default model identifier used when no override is configured.
pub const DEFAULT_MODEL: &str = "claude-3-opus-20240229";

/// Default sampling temperature.
pub const DEFAULT_TEMPERATURE: f64 = 0.7;

/// Options for one generation call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationOptions {
    /// Model identifier.
    pub model: String,
    /// Sampling temperature in `[0, 1]`.
    pub temperature: f64,
    /// Optional cap on output size, in tokens.
    pub max_tokens: Option<u32>,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: None,
        }
    }
}

impl GenerationOptions {
    /// Creates options with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the model identifier.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the temperature, clamped to `[0, 1]`.
    #[must_use]
    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature.clamp(0.0, 1.0);
        self
    }

    /// Sets the output size cap.
    #[must_use]
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }
}

/// A single request/response call to an external text-generation service.
///
/// Implementations classify their failures as transient or fatal; retry of
/// transient failures happens in [`GenerationClient`](crate::client::GenerationClient),
/// not here.
#[async_trait]
pub trait GenerationBackend: Send + Sync + Debug {
    /// Generates raw text from a system prompt and user content.
    async fn generate(
        &self,
        system_prompt: &str,
        user_content: &str,
        options: &GenerationOptions,
    ) -> Result<String, BackendError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = GenerationOptions::default();
        assert_eq!(options.model, DEFAULT_MODEL);
        assert_eq!(options.temperature, DEFAULT_TEMPERATURE);
        assert!(options.max_tokens.is_none());
    }

    #[test]
    fn test_options_builder() {
        let options = GenerationOptions::new()
            .with_model("claude-3-5-sonnet-20241022")
            .with_temperature(0.2)
            .with_max_tokens(2048);

        assert_eq!(options.model, "claude-3-5-sonnet-20241022");
        assert_eq!(options.temperature, 0.2);
        assert_eq!(options.max_tokens, Some(2048));
    }

    #[test]
    fn test_temperature_clamped() {
        assert_eq!(GenerationOptions::new().with_temperature(1.7).temperature, 1.0);
        assert_eq!(GenerationOptions::new().with_temperature(-0.3).temperature, 0.0);
    }
}
