//! Scripted in-memory backend for tests and demos.

use super::{GenerationBackend, GenerationOptions};
use crate::errors::BackendError;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};

/// A backend that replays a queue of canned results.
///
/// Each call pops the next scripted reply; an exhausted script fails
/// fatally. Thread-safe, so one instance can be shared across concurrent
/// runs when call interleaving does not matter.
#[derive(Debug, Default)]
pub struct ScriptedBackend {
    replies: Mutex<VecDeque<Result<String, BackendError>>>,
    calls: AtomicUsize,
}

impl ScriptedBackend {
    /// Creates a backend with an empty script.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a backend scripted with successful replies.
    #[must_use]
    pub fn with_replies(replies: impl IntoIterator<Item = impl Into<String>>) -> Self {
        let backend = Self::new();
        for reply in replies {
            backend.push_ok(reply);
        }
        backend
    }

    /// Appends a successful reply to the script.
    pub fn push_ok(&self, text: impl Into<String>) {
        self.replies.lock().push_back(Ok(text.into()));
    }

    /// Appends a failure to the script.
    pub fn push_err(&self, error: BackendError) {
        self.replies.lock().push_back(Err(error));
    }

    /// Number of calls received so far.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Number of scripted replies not yet consumed.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.replies.lock().len()
    }
}

#[async_trait]
impl GenerationBackend for ScriptedBackend {
    async fn generate(
        &self,
        _system_prompt: &str,
        _user_content: &str,
        _options: &GenerationOptions,
    ) -> Result<String, BackendError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.replies
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(BackendError::Fatal("scripted backend exhausted".into())))
    }
}
