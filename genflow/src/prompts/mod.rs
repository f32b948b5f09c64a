//! Prompt registry mapping (stage, operation) pairs to instruction templates.
//!
//! The registry is built once at startup and is read-only afterwards, so it
//! can be shared across concurrent runs behind an `Arc` without locking.

mod architecture;
mod implementation;
mod qa;
mod requirements;

use crate::core::StageKind;
use crate::errors::GenflowError;
use std::collections::HashMap;

/// Read-only lookup of instruction templates.
#[derive(Debug, Clone)]
pub struct PromptRegistry {
    templates: HashMap<StageKind, HashMap<&'static str, &'static str>>,
}

impl PromptRegistry {
    /// Builds the registry with every known template.
    #[must_use]
    pub fn new() -> Self {
        let mut templates: HashMap<StageKind, HashMap<&'static str, &'static str>> =
            HashMap::new();

        templates.insert(
            StageKind::Requirements,
            HashMap::from([
                ("analyze_requirements", requirements::ANALYZE_REQUIREMENTS),
                ("refine_requirements", requirements::REFINE_REQUIREMENTS),
            ]),
        );
        templates.insert(
            StageKind::Architecture,
            HashMap::from([
                ("design_architecture", architecture::DESIGN_ARCHITECTURE),
                ("review_architecture", architecture::REVIEW_ARCHITECTURE),
            ]),
        );
        templates.insert(
            StageKind::Implementation,
            HashMap::from([
                ("generate_code", implementation::GENERATE_CODE),
                ("generate_styles", implementation::GENERATE_STYLES),
                ("generate_tests", implementation::GENERATE_TESTS),
            ]),
        );
        templates.insert(
            StageKind::Qa,
            HashMap::from([
                ("review_code", qa::REVIEW_CODE),
                ("fix_issues", qa::FIX_ISSUES),
            ]),
        );

        Self { templates }
    }

    /// Looks up the template for a (stage, operation) pair.
    ///
    /// # Errors
    ///
    /// Returns `GenflowError::PromptNotFound` when the operation is not
    /// registered for the stage.
    pub fn get(&self, kind: StageKind, operation: &str) -> Result<&'static str, GenflowError> {
        self.templates
            .get(&kind)
            .and_then(|ops| ops.get(operation).copied())
            .ok_or_else(|| GenflowError::PromptNotFound {
                kind,
                operation: operation.to_string(),
            })
    }

    /// The operation keys registered for a stage.
    #[must_use]
    pub fn operations(&self, kind: StageKind) -> Vec<&'static str> {
        let mut ops: Vec<&'static str> = self
            .templates
            .get(&kind)
            .map(|m| m.keys().copied().collect())
            .unwrap_or_default();
        ops.sort_unstable();
        ops
    }
}

impl Default for PromptRegistry {
    fn default() -> Self {
        Self::new()
    }
}
