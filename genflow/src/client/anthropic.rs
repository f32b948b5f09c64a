//! HTTP backend for an Anthropic-style messages API.

use super::{GenerationBackend, GenerationOptions};
use crate::errors::BackendError;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

const ANTHROPIC_API_BASE: &str = "https://api.anthropic.com/v1";
const API_VERSION: &str = "2023-06-01";
const DEFAULT_MAX_TOKENS: u32 = 4096;

/// Configuration for the Anthropic backend.
#[derive(Clone)]
pub struct AnthropicConfig {
    /// API key.
    pub api_key: String,
    /// Base URL of the messages API.
    pub base_url: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for AnthropicConfig {
    fn default() -> Self {
        Self {
            api_key: std::env::var("ANTHROPIC_API_KEY").unwrap_or_default(),
            base_url: ANTHROPIC_API_BASE.to_string(),
            timeout_secs: 120,
        }
    }
}

impl std::fmt::Debug for AnthropicConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnthropicConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Generation backend speaking the Anthropic messages API.
#[derive(Debug)]
pub struct AnthropicBackend {
    config: AnthropicConfig,
    http: Client,
}

impl AnthropicBackend {
    /// Creates a backend from the given configuration.
    ///
    /// # Errors
    ///
    /// Fails fatally when the API key is empty or the HTTP client cannot be
    /// constructed.
    pub fn new(config: AnthropicConfig) -> Result<Self, BackendError> {
        if config.api_key.is_empty() {
            return Err(BackendError::Fatal(
                "Anthropic API key is required; set ANTHROPIC_API_KEY".into(),
            ));
        }

        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| BackendError::Fatal(format!("failed to create HTTP client: {e}")))?;

        Ok(Self { config, http })
    }

    /// Creates a backend from environment variables.
    pub fn from_env() -> Result<Self, BackendError> {
        Self::new(AnthropicConfig::default())
    }

    fn classify_status(status: StatusCode, body: &str) -> BackendError {
        if status == StatusCode::REQUEST_TIMEOUT
            || status == StatusCode::TOO_MANY_REQUESTS
            || status.is_server_error()
        {
            BackendError::Transient(format!("backend returned {status}: {body}"))
        } else {
            BackendError::Fatal(format!("backend rejected request ({status}): {body}"))
        }
    }
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: Vec<Message<'a>>,
    temperature: f64,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    block_type: String,
    #[serde(default)]
    text: String,
}

#[async_trait]
impl GenerationBackend for AnthropicBackend {
    async fn generate(
        &self,
        system_prompt: &str,
        user_content: &str,
        options: &GenerationOptions,
    ) -> Result<String, BackendError> {
        let request = MessagesRequest {
            model: &options.model,
            max_tokens: options.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
            system: system_prompt,
            messages: vec![Message {
                role: "user",
                content: user_content,
            }],
            temperature: options.temperature,
        };

        let response = self
            .http
            .post(format!("{}/messages", self.config.base_url))
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", API_VERSION)
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| BackendError::Transient(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(Self::classify_status(status, &body));
        }

        let parsed: MessagesResponse = response
            .json()
            .await
            .map_err(|e| BackendError::Transient(format!("failed to decode response: {e}")))?;

        let text: String = parsed
            .content
            .iter()
            .filter(|block| block.block_type == "text")
            .map(|block| block.text.as_str())
            .collect();

        Ok(text)
    }
}
