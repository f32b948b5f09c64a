//! Core data model: stage identities, run statuses, artifacts, and
//! progress events.

mod artifact;
mod event;
mod status;

pub use artifact::{
    ArchitectureDecisions, ArchitecturePlan, ArtifactSet, CodeBundle, ComponentNode,
    ComponentSpec, DataFlow, FolderStructure, Recommendations, RequirementsSpec, ReviewIssue,
    ReviewReport, SourceFile, StageArtifact, TechnicalRequirements,
};
pub use event::ProgressEvent;
pub use status::{ProgressPhase, RunStatus, StageKind};
