//! JSON payload extraction from generation output.
//!
//! Models frequently wrap their JSON in a markdown code fence or surround
//! it with prose. Extraction tolerates both; the deserialization itself is
//! strict, and any mismatch with the stage's schema is a parse failure.

use crate::core::StageKind;
use crate::errors::GenflowError;
use regex::Regex;
use serde::de::DeserializeOwned;
use std::sync::OnceLock;

static FENCE: OnceLock<Regex> = OnceLock::new();

#[allow(clippy::expect_used)]
fn fence() -> &'static Regex {
    FENCE.get_or_init(|| {
        Regex::new(r"(?s)```(?:json)?\s*(\{.*?\})\s*```").expect("fence pattern is valid")
    })
}

/// Locates the JSON payload within raw model text.
fn payload(text: &str) -> &str {
    let trimmed = text.trim();

    if let Some(captures) = fence().captures(trimmed) {
        if let Some(inner) = captures.get(1) {
            return inner.as_str();
        }
    }

    // Fall back to the outermost brace pair.
    if let (Some(start), Some(end)) = (trimmed.find('{'), trimmed.rfind('}')) {
        if start < end {
            return &trimmed[start..=end];
        }
    }

    trimmed
}

/// Parses model text into a stage's typed output.
///
/// # Errors
///
/// Returns `GenflowError::Parse` naming the stage when the text does not
/// conform to `T`'s shape.
pub(super) fn parse_stage_output<T: DeserializeOwned>(
    stage: StageKind,
    text: &str,
) -> Result<T, GenflowError> {
    serde_json::from_str(payload(text)).map_err(|e| GenflowError::Parse {
        stage,
        detail: e.to_string(),
    })
}
