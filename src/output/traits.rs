//! Output handler traits and types
//!
//! This module defines the trait interface for catalogue writers and the
//! errors they report.

use crate::records::MergedRecord;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Trait for catalogue writers
///
/// A handler serializes the whole merged record set into one file. The
/// caller picks the file stem; the handler supplies the extension.
pub trait OutputHandler {
    /// File extension without the leading dot
    fn extension(&self) -> &'static str;

    /// Writes every record to `path`, replacing any existing file
    ///
    /// # Arguments
    ///
    /// * `records` - The merged records, in output order
    /// * `path` - Destination file
    fn write(&self, records: &[MergedRecord], path: &Path) -> OutputResult<()>;
}
