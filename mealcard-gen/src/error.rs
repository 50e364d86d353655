//! Error types for mealcard-gen
//!
//! Every variant is fatal to the current run. Ingestion errors are raised
//! before the record store is touched; a render error is raised before any
//! record is marked processed.

use printpdf::image_crate::ImageError;
use std::path::PathBuf;
use thiserror::Error;

/// Card generation error
#[derive(Debug, Error)]
pub enum GenerateError {
    /// Roster file missing, unreadable or corrupt, or a named sheet is absent
    #[error("Cannot read roster {}: {}", .path.display(), .reason)]
    SourceRead { path: PathBuf, reason: String },

    /// Required columns missing from a roster sheet
    #[error(
        "Sheet '{}' in {} is missing required column(s): {}",
        .sheet,
        .path.display(),
        .missing.join(", ")
    )]
    Schema {
        path: PathBuf,
        sheet: String,
        missing: Vec<String>,
    },

    /// Record store unreachable or a write failed
    #[error("Record store error: {0}")]
    Store(#[from] mealcard_common::Error),

    /// Card document could not be produced or written
    #[error("Cannot write card document {}: {}", .path.display(), .source)]
    Render {
        path: PathBuf,
        #[source]
        source: RenderError,
    },

    /// Invalid geometry or other configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl GenerateError {
    pub(crate) fn source_read(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        GenerateError::SourceRead {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn render(path: impl Into<PathBuf>, source: impl Into<RenderError>) -> Self {
        GenerateError::Render {
            path: path.into(),
            source: source.into(),
        }
    }
}

/// Why a card document could not be produced
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("no records to render")]
    NoRecords,

    /// Configured logo missing or not a decodable image
    #[error("logo {}: {}", .path.display(), .source)]
    Logo {
        path: PathBuf,
        #[source]
        source: ImageError,
    },

    /// Document assembly or serialisation failed
    #[error("PDF: {0}")]
    Pdf(#[from] printpdf::Error),

    #[error("I/O: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for card generation
pub type Result<T> = std::result::Result<T, GenerateError>;
