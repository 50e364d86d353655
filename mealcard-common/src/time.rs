//! Timestamp utilities

use chrono::{DateTime, Local};

/// Compact local-time stamp used in generated file names (`20241025_143005`)
pub fn file_stamp(at: DateTime<Local>) -> String {
    at.format("%Y%m%d_%H%M%S").to_string()
}
