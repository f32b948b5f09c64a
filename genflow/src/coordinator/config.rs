//! Coordinator configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the pipeline coordinator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoordinatorConfig {
    /// Maximum number of runs executing stages at once. Runs beyond the
    /// limit stay queued until a slot frees up. Bounds outbound calls to
    /// the generation backend.
    pub max_concurrent_runs: usize,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            max_concurrent_runs: 4,
        }
    }
}

impl CoordinatorConfig {
    /// Creates a config with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the concurrency limit. A limit of zero is treated as one.
    #[must_use]
    pub fn with_max_concurrent_runs(mut self, limit: usize) -> Self {
        self.max_concurrent_runs = limit.max(1);
        self
    }
}
