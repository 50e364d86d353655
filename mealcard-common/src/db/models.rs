//! Database models

use serde::{Deserialize, Serialize};

/// One student row of the `students` table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentRecord {
    /// Primary key (`ADMNO`)
    pub admission_number: String,
    pub name: String,
    pub grade: String,
    pub stream: String,
    /// A card has already been generated for this student
    pub processed: bool,
}

impl StudentRecord {
    /// Create an unprocessed record
    pub fn new(
        admission_number: impl Into<String>,
        name: impl Into<String>,
        grade: impl Into<String>,
        stream: impl Into<String>,
    ) -> Self {
        Self {
            admission_number: admission_number.into(),
            name: name.into(),
            grade: grade.into(),
            stream: stream.into(),
            processed: false,
        }
    }
}

/// Outcome of a merge batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MergeSummary {
    /// Records whose admission number was new
    pub inserted: u64,
    /// Records left untouched because the admission number already existed
    pub skipped: u64,
}

/// Row counts by processed state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StoreCounts {
    pub total: i64,
    pub processed: i64,
    pub unprocessed: i64,
}
