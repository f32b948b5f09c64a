//! Progress sink trait and implementations.
//!
//! Sinks are constructor-injected into the coordinator; there is no
//! process-global sink registry.

mod sink;

pub use sink::{CollectingProgressSink, LoggingProgressSink, NoOpProgressSink, ProgressSink};
