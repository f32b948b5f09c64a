//! Test fixtures: well-formed stage payloads and pre-populated artifact
//! sets.
//!
//! Shared by unit tests, the coordinator integration tests, and the
//! benchmark harness.

#![allow(clippy::expect_used, clippy::missing_panics_doc)]

use crate::client::ScriptedBackend;
use crate::core::{
    ArchitecturePlan, ArtifactSet, CodeBundle, RequirementsSpec, ReviewReport, StageArtifact,
    StageKind,
};

/// A well-formed requirements payload, as a backend would return it.
#[must_use]
pub fn requirements_json() -> String {
    serde_json::json!({
        "components": [
            {
                "name": "TodoList",
                "type": "component",
                "description": "Displays and filters todo items",
                "features": ["filtering", "completion toggling"],
                "dependencies": ["TodoItem"]
            },
            {
                "name": "TodoPage",
                "type": "page",
                "description": "Top-level todo page",
                "features": ["layout"],
                "dependencies": ["TodoList"]
            }
        ],
        "technical_requirements": {
            "state_management": ["local component state"],
            "api_integrations": [],
            "authentication": false,
            "routing": true,
            "data_persistence": true
        },
        "architecture_decisions": {
            "folder_structure": ["src/components", "src/pages"],
            "design_patterns": ["container/presenter"],
            "performance_considerations": ["memoized list rendering"]
        }
    })
    .to_string()
}

/// A well-formed architecture payload.
#[must_use]
pub fn architecture_json() -> String {
    serde_json::json!({
        "folder_structure": {
            "components": ["TodoList", "TodoItem"],
            "features": ["todos"],
            "hooks": ["useTodos"],
            "utils": ["storage"],
            "types": ["todo"]
        },
        "component_hierarchy": [
            {
                "name": "TodoPage",
                "type": "page",
                "children": ["TodoList"],
                "props": {},
                "state_management": "zustand"
            }
        ],
        "data_flow": {
            "state_management": {"store": "todos"},
            "api_integration": {},
            "event_handling": {"toggle": "onToggle"}
        }
    })
    .to_string()
}

/// A well-formed implementation payload.
#[must_use]
pub fn implementation_json() -> String {
    serde_json::json!({
        "files": [
            {
                "path": "src/App.tsx",
                "content": "export default function App() { return null; }",
                "language": "typescript"
            },
            {
                "path": "src/components/TodoList.tsx",
                "content": "export function TodoList() { return null; }",
                "language": "typescript"
            }
        ],
        "entry_point": "src/App.tsx",
        "notes": ["Generated with strict TypeScript settings"]
    })
    .to_string()
}

/// A well-formed review payload.
#[must_use]
pub fn qa_json() -> String {
    serde_json::json!({
        "issues": [
            {
                "type": "suggestion",
                "file": "src/components/TodoList.tsx",
                "line": 1,
                "message": "Consider keying list items by id",
                "fix": "Use todo.id as the key prop"
            }
        ],
        "recommendations": {
            "performance": ["Memoize the filtered list"],
            "security": [],
            "accessibility": ["Label the filter controls"],
            "testing": ["Add a toggle interaction test"]
        }
    })
    .to_string()
}

/// A backend scripted with one well-formed reply per stage, in pipeline
/// order.
#[must_use]
pub fn happy_backend() -> ScriptedBackend {
    ScriptedBackend::with_replies([
        requirements_json(),
        architecture_json(),
        implementation_json(),
        qa_json(),
    ])
}

fn parsed_requirements() -> RequirementsSpec {
    serde_json::from_str(&requirements_json()).expect("fixture is valid")
}

fn parsed_architecture() -> ArchitecturePlan {
    serde_json::from_str(&architecture_json()).expect("fixture is valid")
}

fn parsed_implementation() -> CodeBundle {
    serde_json::from_str(&implementation_json()).expect("fixture is valid")
}

fn parsed_qa() -> ReviewReport {
    serde_json::from_str(&qa_json()).expect("fixture is valid")
}

/// The parsed fixture artifact for a stage.
#[must_use]
pub fn artifact_for(kind: StageKind) -> StageArtifact {
    match kind {
        StageKind::Requirements => StageArtifact::Requirements(parsed_requirements()),
        StageKind::Architecture => StageArtifact::Architecture(parsed_architecture()),
        StageKind::Implementation => StageArtifact::Implementation(parsed_implementation()),
        StageKind::Qa => StageArtifact::Review(parsed_qa()),
    }
}

/// An artifact set with the requirements artifact committed.
#[must_use]
pub fn set_with_requirements() -> ArtifactSet {
    let mut set = ArtifactSet::new("Build a todo app");
    set.insert(StageArtifact::Requirements(parsed_requirements()))
        .expect("empty set accepts requirements");
    set
}

/// An artifact set with requirements and architecture committed.
#[must_use]
pub fn set_with_architecture() -> ArtifactSet {
    let mut set = set_with_requirements();
    set.insert(StageArtifact::Architecture(parsed_architecture()))
        .expect("set accepts architecture");
    set
}

/// An artifact set with requirements, architecture, and implementation
/// committed.
#[must_use]
pub fn set_with_implementation() -> ArtifactSet {
    let mut set = set_with_architecture();
    set.insert(StageArtifact::Implementation(parsed_implementation()))
        .expect("set accepts implementation");
    set
}
