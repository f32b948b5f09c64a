//! Generation client: one backend call with timeout and bounded retry.
//!
//! The client is the only component that retries. Transient backend
//! failures are retried with backoff and jitter up to the configured
//! attempt budget; fatal failures propagate immediately. Callers observe
//! only the final outcome.

#[cfg(feature = "anthropic")]
mod anthropic;
mod backend;
mod retry;
mod scripted;

#[cfg(feature = "anthropic")]
pub use anthropic::{AnthropicBackend, AnthropicConfig};
pub use backend::{GenerationBackend, GenerationOptions, DEFAULT_MODEL, DEFAULT_TEMPERATURE};
pub use retry::{BackoffStrategy, JitterStrategy, RetryConfig};
pub use scripted::ScriptedBackend;

use crate::errors::BackendError;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(120);

/// Client wrapping a [`GenerationBackend`] with per-call timeout and retry.
#[derive(Debug, Clone)]
pub struct GenerationClient {
    backend: Arc<dyn GenerationBackend>,
    retry: RetryConfig,
    call_timeout: Duration,
}

impl GenerationClient {
    /// Creates a client around the given backend with default retry
    /// behavior.
    #[must_use]
    pub fn new(backend: Arc<dyn GenerationBackend>) -> Self {
        Self {
            backend,
            retry: RetryConfig::default(),
            call_timeout: DEFAULT_CALL_TIMEOUT,
        }
    }

    /// Sets the retry configuration.
    #[must_use]
    pub fn with_retry_config(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Sets the per-call timeout. A timed-out call counts as transient.
    #[must_use]
    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = timeout;
        self
    }

    /// The configured per-call timeout.
    #[must_use]
    pub fn call_timeout(&self) -> Duration {
        self.call_timeout
    }

    /// Generates text, retrying transient failures up to the attempt
    /// budget.
    ///
    /// # Errors
    ///
    /// Returns the fatal error immediately, or the last transient error
    /// once retries are exhausted.
    pub async fn generate(
        &self,
        system_prompt: &str,
        user_content: &str,
        options: &GenerationOptions,
    ) -> Result<String, BackendError> {
        let mut attempt = 0;

        loop {
            let call = self.backend.generate(system_prompt, user_content, options);
            let result = match tokio::time::timeout(self.call_timeout, call).await {
                Ok(result) => result,
                Err(_) => Err(BackendError::Transient(format!(
                    "backend call timed out after {}ms",
                    self.call_timeout.as_millis()
                ))),
            };

            match result {
                Ok(text) => return Ok(text),
                Err(err) if err.is_transient() && attempt + 1 < self.retry.max_attempts => {
                    let delay = self.retry.delay_for_attempt(attempt);
                    attempt += 1;
                    debug!(
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "retrying transient backend error"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(err) => return Err(err),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    fn fast_retry() -> RetryConfig {
        RetryConfig::new()
            .with_base_delay_ms(1)
            .with_jitter(JitterStrategy::None)
    }

    #[tokio::test]
    async fn test_success_first_try() {
        let backend = Arc::new(ScriptedBackend::with_replies(["hello"]));
        let client = GenerationClient::new(backend.clone()).with_retry_config(fast_retry());

        let text = client
            .generate("system", "user", &GenerationOptions::default())
            .await
            .unwrap();
        assert_eq!(text, "hello");
        assert_eq!(backend.call_count(), 1);
    }

    #[tokio::test]
    async fn test_transient_retried_until_success() {
        let backend = Arc::new(ScriptedBackend::new());
        backend.push_err(BackendError::Transient("rate limited".into()));
        backend.push_err(BackendError::Transient("rate limited".into()));
        backend.push_ok("recovered");

        let client = GenerationClient::new(backend.clone()).with_retry_config(fast_retry());
        let text = client
            .generate("system", "user", &GenerationOptions::default())
            .await
            .unwrap();

        assert_eq!(text, "recovered");
        assert_eq!(backend.call_count(), 3);
    }

    #[tokio::test]
    async fn test_transient_exhausted_surfaces_last_error() {
        let backend = Arc::new(ScriptedBackend::new());
        for _ in 0..3 {
            backend.push_err(BackendError::Transient("still down".into()));
        }

        let client = GenerationClient::new(backend.clone()).with_retry_config(fast_retry());
        let err = client
            .generate("system", "user", &GenerationOptions::default())
            .await
            .unwrap_err();

        assert!(err.is_transient());
        assert_eq!(backend.call_count(), 3);
    }

    #[tokio::test]
    async fn test_fatal_not_retried() {
        let backend = Arc::new(ScriptedBackend::new());
        backend.push_err(BackendError::Fatal("policy rejection".into()));
        backend.push_ok("never reached");

        let client = GenerationClient::new(backend.clone()).with_retry_config(fast_retry());
        let err = client
            .generate("system", "user", &GenerationOptions::default())
            .await
            .unwrap_err();

        assert!(err.is_fatal());
        assert_eq!(backend.call_count(), 1);
        assert_eq!(backend.remaining(), 1);
    }

    #[derive(Debug)]
    struct SlowBackend;

    #[async_trait]
    impl GenerationBackend for SlowBackend {
        async fn generate(
            &self,
            _system_prompt: &str,
            _user_content: &str,
            _options: &GenerationOptions,
        ) -> Result<String, BackendError> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok("too late".into())
        }
    }

    #[tokio::test]
    async fn test_timeout_is_transient() {
        let client = GenerationClient::new(Arc::new(SlowBackend))
            .with_retry_config(fast_retry().with_max_attempts(1))
            .with_call_timeout(Duration::from_millis(10));

        let err = client
            .generate("system", "user", &GenerationOptions::default())
            .await
            .unwrap_err();

        assert!(err.is_transient());
        assert!(err.to_string().contains("timed out"));
    }
}
