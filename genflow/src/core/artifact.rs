//! Typed stage artifacts and the per-run artifact set.
//!
//! Each stage produces exactly one artifact, shaped by the JSON format its
//! prompt demands. Artifacts are append-only: a stage never mutates a prior
//! artifact, only adds its own.

use super::StageKind;
use crate::errors::GenflowError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One UI component or page identified during requirements analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentSpec {
    /// The component name.
    pub name: String,
    /// Whether this is a `page` or a `component`.
    #[serde(rename = "type")]
    pub component_type: String,
    /// What the component does.
    pub description: String,
    /// Features the component must provide.
    #[serde(default)]
    pub features: Vec<String>,
    /// Other components this one depends on.
    #[serde(default)]
    pub dependencies: Vec<String>,
}

/// Cross-cutting technical requirements of the project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TechnicalRequirements {
    /// State management concerns.
    #[serde(default)]
    pub state_management: Vec<String>,
    /// External API integrations.
    #[serde(default)]
    pub api_integrations: Vec<String>,
    /// Whether the project needs authentication.
    pub authentication: bool,
    /// Whether the project needs client-side routing.
    pub routing: bool,
    /// Whether the project needs data persistence.
    pub data_persistence: bool,
}

/// High-level architectural decisions recorded with the requirements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchitectureDecisions {
    /// Proposed folder layout.
    #[serde(default)]
    pub folder_structure: Vec<String>,
    /// Design patterns to apply.
    #[serde(default)]
    pub design_patterns: Vec<String>,
    /// Performance considerations.
    #[serde(default)]
    pub performance_considerations: Vec<String>,
}

/// Output of the requirements stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequirementsSpec {
    /// The components the project breaks down into.
    pub components: Vec<ComponentSpec>,
    /// Cross-cutting technical requirements.
    pub technical_requirements: TechnicalRequirements,
    /// Early architectural decisions.
    pub architecture_decisions: ArchitectureDecisions,
}

/// Folder layout of the designed application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderStructure {
    /// Component directories.
    #[serde(default)]
    pub components: Vec<String>,
    /// Feature directories.
    #[serde(default)]
    pub features: Vec<String>,
    /// Hook modules.
    #[serde(default)]
    pub hooks: Vec<String>,
    /// Utility modules.
    #[serde(default)]
    pub utils: Vec<String>,
    /// Type definition modules.
    #[serde(default)]
    pub types: Vec<String>,
}

/// One node in the designed component hierarchy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentNode {
    /// The component name.
    pub name: String,
    /// Granularity of the node (e.g. `atom`, `organism`, `page`).
    #[serde(rename = "type")]
    pub node_type: String,
    /// Names of child components.
    #[serde(default)]
    pub children: Vec<String>,
    /// The component's props, as a free-form object.
    #[serde(default)]
    pub props: serde_json::Value,
    /// How the component manages state.
    #[serde(default)]
    pub state_management: String,
}

/// Data flow description of the designed application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataFlow {
    /// State management topology.
    #[serde(default)]
    pub state_management: serde_json::Value,
    /// API integration points.
    #[serde(default)]
    pub api_integration: serde_json::Value,
    /// Event handling paths.
    #[serde(default)]
    pub event_handling: serde_json::Value,
}

/// Output of the architecture stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchitecturePlan {
    /// Folder layout.
    pub folder_structure: FolderStructure,
    /// Component hierarchy.
    pub component_hierarchy: Vec<ComponentNode>,
    /// Data flow description.
    pub data_flow: DataFlow,
}

/// One generated source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFile {
    /// Path of the file relative to the project root.
    pub path: String,
    /// The file content.
    pub content: String,
    /// Source language, when the generator declares one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

/// Output of the implementation stage: the generated scaffold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeBundle {
    /// The generated files.
    pub files: Vec<SourceFile>,
    /// The file to open or run first, when declared.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry_point: Option<String>,
    /// Free-form notes from the generator.
    #[serde(default)]
    pub notes: Vec<String>,
}

impl CodeBundle {
    /// Returns true if the bundle contains no files.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// One issue found during review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewIssue {
    /// Severity of the issue (`error`, `warning`, or `suggestion`).
    #[serde(rename = "type")]
    pub severity: String,
    /// The file the issue was found in.
    pub file: String,
    /// The line the issue was found on, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u64>,
    /// What is wrong.
    pub message: String,
    /// A suggested fix, when available.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fix: Option<String>,
}

/// Thematic recommendations from the review.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Recommendations {
    /// Performance recommendations.
    #[serde(default)]
    pub performance: Vec<String>,
    /// Security recommendations.
    #[serde(default)]
    pub security: Vec<String>,
    /// Accessibility recommendations.
    #[serde(default)]
    pub accessibility: Vec<String>,
    /// Testing recommendations.
    #[serde(default)]
    pub testing: Vec<String>,
}

/// Output of the QA stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewReport {
    /// Issues found during review.
    pub issues: Vec<ReviewIssue>,
    /// Thematic recommendations.
    #[serde(default)]
    pub recommendations: Recommendations,
}

/// The structured output of one stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "stage", content = "data", rename_all = "snake_case")]
pub enum StageArtifact {
    /// Requirements specification.
    Requirements(RequirementsSpec),
    /// Architecture plan.
    Architecture(ArchitecturePlan),
    /// Generated code bundle.
    Implementation(CodeBundle),
    /// Code review report.
    Review(ReviewReport),
}

impl StageArtifact {
    /// The stage that produced this artifact.
    #[must_use]
    pub fn kind(&self) -> StageKind {
        match self {
            Self::Requirements(_) => StageKind::Requirements,
            Self::Architecture(_) => StageKind::Architecture,
            Self::Implementation(_) => StageKind::Implementation,
            Self::Review(_) => StageKind::Qa,
        }
    }
}

/// The artifacts accumulated by one run, keyed by producing stage.
///
/// The set also carries the project brief (the raw request text) consumed by
/// the requirements stage. Exactly one artifact per completed stage; inserts
/// for an already-present stage are rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactSet {
    brief: String,
    artifacts: BTreeMap<StageKind, StageArtifact>,
}

impl ArtifactSet {
    /// Creates an empty set around the project brief.
    #[must_use]
    pub fn new(brief: impl Into<String>) -> Self {
        Self {
            brief: brief.into(),
            artifacts: BTreeMap::new(),
        }
    }

    /// The raw project request text.
    #[must_use]
    pub fn brief(&self) -> &str {
        &self.brief
    }

    /// Appends a stage's artifact.
    ///
    /// # Errors
    ///
    /// Returns an internal error if the stage already committed an artifact.
    pub fn insert(&mut self, artifact: StageArtifact) -> Result<(), GenflowError> {
        let kind = artifact.kind();
        if self.artifacts.contains_key(&kind) {
            return Err(GenflowError::Internal(format!(
                "artifact for {kind} stage already present"
            )));
        }
        self.artifacts.insert(kind, artifact);
        Ok(())
    }

    /// Returns the artifact produced by the given stage, if present.
    #[must_use]
    pub fn get(&self, kind: StageKind) -> Option<&StageArtifact> {
        self.artifacts.get(&kind)
    }

    /// Returns true if the given stage has committed its artifact.
    #[must_use]
    pub fn contains(&self, kind: StageKind) -> bool {
        self.artifacts.contains_key(&kind)
    }

    /// Number of committed artifacts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    /// Returns true if no stage has committed yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }

    /// The requirements specification, if committed.
    #[must_use]
    pub fn requirements(&self) -> Option<&RequirementsSpec> {
        match self.artifacts.get(&StageKind::Requirements) {
            Some(StageArtifact::Requirements(spec)) => Some(spec),
            _ => None,
        }
    }

    /// The architecture plan, if committed.
    #[must_use]
    pub fn architecture(&self) -> Option<&ArchitecturePlan> {
        match self.artifacts.get(&StageKind::Architecture) {
            Some(StageArtifact::Architecture(plan)) => Some(plan),
            _ => None,
        }
    }

    /// The code bundle, if committed.
    #[must_use]
    pub fn implementation(&self) -> Option<&CodeBundle> {
        match self.artifacts.get(&StageKind::Implementation) {
            Some(StageArtifact::Implementation(bundle)) => Some(bundle),
            _ => None,
        }
    }

    /// The review report, if committed.
    #[must_use]
    pub fn review(&self) -> Option<&ReviewReport> {
        match self.artifacts.get(&StageKind::Qa) {
            Some(StageArtifact::Review(report)) => Some(report),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_spec() -> RequirementsSpec {
        RequirementsSpec {
            components: vec![ComponentSpec {
                name: "TodoList".into(),
                component_type: "component".into(),
                description: "Lists todo items".into(),
                features: vec!["filtering".into()],
                dependencies: vec![],
            }],
            technical_requirements: TechnicalRequirements {
                state_management: vec!["local".into()],
                api_integrations: vec![],
                authentication: false,
                routing: true,
                data_persistence: true,
            },
            architecture_decisions: ArchitectureDecisions {
                folder_structure: vec!["src/components".into()],
                design_patterns: vec!["container/presenter".into()],
                performance_considerations: vec![],
            },
        }
    }

    #[test]
    fn test_artifact_kind() {
        let artifact = StageArtifact::Requirements(sample_spec());
        assert_eq!(artifact.kind(), StageKind::Requirements);
    }

    #[test]
    fn test_set_append_and_lookup() {
        let mut set = ArtifactSet::new("Build a todo app");
        assert!(set.is_empty());
        assert_eq!(set.brief(), "Build a todo app");

        set.insert(StageArtifact::Requirements(sample_spec())).unwrap();
        assert_eq!(set.len(), 1);
        assert!(set.contains(StageKind::Requirements));
        assert!(set.requirements().is_some());
        assert!(set.architecture().is_none());
    }

    #[test]
    fn test_set_rejects_duplicate_stage() {
        let mut set = ArtifactSet::new("brief");
        set.insert(StageArtifact::Requirements(sample_spec())).unwrap();

        let err = set
            .insert(StageArtifact::Requirements(sample_spec()))
            .unwrap_err();
        assert!(err.to_string().contains("already present"));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_requirements_spec_deserializes_strictly() {
        // authentication is required; a response without it must not parse.
        let malformed = serde_json::json!({
            "components": [],
            "technical_requirements": {
                "state_management": [],
                "api_integrations": [],
                "routing": true,
                "data_persistence": false
            },
            "architecture_decisions": {}
        });
        assert!(serde_json::from_value::<RequirementsSpec>(malformed).is_err());
    }

    #[test]
    fn test_artifact_round_trip() {
        let artifact = StageArtifact::Implementation(CodeBundle {
            files: vec![SourceFile {
                path: "src/App.tsx".into(),
                content: "export default function App() {}".into(),
                language: Some("typescript".into()),
            }],
            entry_point: Some("src/App.tsx".into()),
            notes: vec![],
        });

        let json = serde_json::to_string(&artifact).unwrap();
        let back: StageArtifact = serde_json::from_str(&json).unwrap();
        assert_eq!(back.kind(), StageKind::Implementation);
    }
}
