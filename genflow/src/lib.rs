//! # Genflow
//!
//! A staged code-generation pipeline coordinator.
//!
//! Genflow takes a natural-language project request and drives it through
//! four generation stages — requirements analysis, architecture design,
//! code implementation, and quality review — against an external
//! text-generation backend, while publishing ordered progress events to a
//! pluggable sink:
//!
//! - **Stage-based execution**: a fixed, total stage order; each stage
//!   consumes the artifacts of the stages before it
//! - **Typed artifacts**: every stage validates its output into a typed
//!   schema before committing it
//! - **Bounded retry**: transient backend failures retry with backoff and
//!   jitter inside the generation client; fatal failures propagate
//! - **Progress observability**: per-run sequenced events, safe for
//!   concurrent publishers
//! - **Admission control**: a configurable cap on concurrently executing
//!   runs
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use genflow::prelude::*;
//! use std::sync::Arc;
//!
//! let client = GenerationClient::new(Arc::new(AnthropicBackend::from_env()?));
//! let prompts = Arc::new(PromptRegistry::new());
//! let coordinator = Coordinator::new(
//!     default_stages(client, prompts),
//!     Arc::new(LoggingProgressSink::new()),
//!     CoordinatorConfig::default(),
//! );
//!
//! let run_id = coordinator.start_run(project_id, "Build a todo app");
//! let outcome = coordinator.wait(run_id).await;
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod cancellation;
pub mod client;
pub mod coordinator;
pub mod core;
pub mod errors;
pub mod events;
pub mod observability;
pub mod prompts;
pub mod stages;
pub mod testing;
pub mod utils;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::cancellation::CancelToken;
    #[cfg(feature = "anthropic")]
    pub use crate::client::{AnthropicBackend, AnthropicConfig};
    pub use crate::client::{
        BackoffStrategy, GenerationBackend, GenerationClient, GenerationOptions, JitterStrategy,
        RetryConfig, ScriptedBackend,
    };
    pub use crate::coordinator::{Coordinator, CoordinatorConfig, RunSnapshot};
    pub use crate::core::{
        ArchitecturePlan, ArtifactSet, CodeBundle, ProgressEvent, ProgressPhase,
        RequirementsSpec, ReviewReport, RunStatus, StageArtifact, StageKind,
    };
    pub use crate::errors::{BackendError, GenflowError, SinkError};
    pub use crate::events::{
        CollectingProgressSink, LoggingProgressSink, NoOpProgressSink, ProgressSink,
    };
    pub use crate::observability::init_tracing;
    pub use crate::prompts::PromptRegistry;
    pub use crate::stages::{
        default_stages, ArchitectureStage, ImplementationStage, QaStage, RequirementsStage,
        Stage, StageDescriptor,
    };
    pub use crate::utils::{generate_uuid, iso_timestamp, Timestamp};
}
