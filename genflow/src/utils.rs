//! UUID and timestamp helpers shared across the crate.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// A UTC timestamp.
pub type Timestamp = DateTime<Utc>;

/// Generates a new UUID v4.
#[must_use]
pub fn generate_uuid() -> Uuid {
    Uuid::new_v4()
}

/// Returns the current UTC time.
#[must_use]
pub fn now() -> Timestamp {
    Utc::now()
}

/// Returns the current UTC time as an ISO 8601 formatted string.
///
/// Format: `YYYY-MM-DDTHH:MM:SS.ffffff+00:00`
#[must_use]
pub fn iso_timestamp() -> String {
    Utc::now().format("%Y-%m-%dT%H:%M:%S%.6f+00:00").to_string()
}
