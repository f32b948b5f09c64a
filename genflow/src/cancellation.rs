//! Cooperative cancellation for runs.

use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};

/// A flag for cooperative cancellation of one run.
///
/// Cancellation is idempotent; only the first reason is kept. The
/// coordinator polls the token between stages — an in-flight backend call
/// is allowed to complete or time out before the run is marked failed.
#[derive(Default)]
pub struct CancelToken {
    cancelled: AtomicBool,
    reason: RwLock<Option<String>>,
}

impl CancelToken {
    /// Creates a token in the not-cancelled state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation with a reason. First reason wins.
    pub fn cancel(&self, reason: impl Into<String>) {
        if self
            .cancelled
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
        {
            *self.reason.write() = Some(reason.into());
        }
    }

    /// Returns whether cancellation has been requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// The cancellation reason, if any.
    #[must_use]
    pub fn reason(&self) -> Option<String> {
        self.reason.read().clone()
    }
}

impl std::fmt::Debug for CancelToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CancelToken")
            .field("cancelled", &self.is_cancelled())
            .field("reason", &self.reason())
            .finish()
    }
}
