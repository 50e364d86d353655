//! Common error types for the meal card tooling

use thiserror::Error;

/// Common result type for record store and configuration operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types shared by the meal card crates
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation error (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A record in a merge batch could not be written; the whole batch was rolled back
    #[error("Merge rolled back at admission number '{admission_number}': {source}")]
    MergeRejected {
        admission_number: String,
        #[source]
        source: sqlx::Error,
    },

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid user input or request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
