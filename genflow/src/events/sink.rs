//! Progress sink trait and implementations.

use crate::core::ProgressEvent;
use crate::errors::SinkError;
use async_trait::async_trait;
use tracing::{info, warn};
use uuid::Uuid;

/// Receives ordered progress events from the coordinator.
///
/// Must be safe for concurrent publishes from many runs. Within one run,
/// events arrive in emission order; implementations must not reorder them.
/// A publish failure is non-fatal to the run — only the individual
/// notification is lost.
#[async_trait]
pub trait ProgressSink: Send + Sync {
    /// Publishes one event.
    ///
    /// # Errors
    ///
    /// Returns `SinkError` when the sink's transport or store rejects the
    /// event.
    async fn publish(&self, event: &ProgressEvent) -> Result<(), SinkError>;
}

/// A sink that discards all events.
///
/// Used as the default when no sink is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpProgressSink;

#[async_trait]
impl ProgressSink for NoOpProgressSink {
    async fn publish(&self, _event: &ProgressEvent) -> Result<(), SinkError> {
        Ok(())
    }
}

/// A sink that logs events through the tracing framework.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingProgressSink;

impl LoggingProgressSink {
    /// Creates a logging sink.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ProgressSink for LoggingProgressSink {
    async fn publish(&self, event: &ProgressEvent) -> Result<(), SinkError> {
        match event.phase {
            crate::core::ProgressPhase::Error => warn!(
                run_id = %event.run_id,
                sequence = event.sequence,
                phase = %event.phase,
                progress = event.progress,
                "{}", event.message
            ),
            _ => info!(
                run_id = %event.run_id,
                sequence = event.sequence,
                phase = %event.phase,
                progress = event.progress,
                "{}", event.message
            ),
        }
        Ok(())
    }
}

/// A collecting sink for tests.
#[derive(Debug, Default)]
pub struct CollectingProgressSink {
    events: parking_lot::RwLock<Vec<ProgressEvent>>,
}

impl CollectingProgressSink {
    /// Creates a collecting sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all collected events.
    #[must_use]
    pub fn events(&self) -> Vec<ProgressEvent> {
        self.events.read().clone()
    }

    /// Returns the events collected for one run, in arrival order.
    #[must_use]
    pub fn events_for(&self, run_id: Uuid) -> Vec<ProgressEvent> {
        self.events
            .read()
            .iter()
            .filter(|e| e.run_id == run_id)
            .cloned()
            .collect()
    }

    /// Number of collected events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.read().len()
    }

    /// Returns true if nothing has been collected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.read().is_empty()
    }

    /// Clears all collected events.
    pub fn clear(&self) {
        self.events.write().clear();
    }
}

#[async_trait]
impl ProgressSink for CollectingProgressSink {
    async fn publish(&self, event: &ProgressEvent) -> Result<(), SinkError> {
        self.events.write().push(event.clone());
        Ok(())
    }
}
