//! # Meal Card Common Library
//!
//! Shared code for the meal card tooling:
//! - Record store (student table, schema creation, queries)
//! - Bootstrap configuration loading and root folder resolution
//! - Error types
//! - Timestamp helpers

pub mod config;
pub mod db;
pub mod error;
pub mod time;

pub use db::{MergeSummary, StoreCounts, StudentRecord, StudentStore};
pub use error::{Error, Result};
