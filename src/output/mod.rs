//! Output module for persisting the merged catalogue
//!
//! This module handles:
//! - Deriving the output file name from the crawled criteria
//! - Writing the catalogue as CSV and/or JSON
//! - Writing per-record chapter contents files

mod contents;
mod csv_output;
mod json_output;
mod naming;
mod traits;

pub use contents::write_contents_files;
pub use csv_output::{CsvOutput, LIST_SEPARATOR};
pub use json_output::JsonOutput;
pub use naming::{output_filename, output_stem};
pub use traits::{OutputError, OutputHandler, OutputResult};

use crate::config::OutputConfig;
use crate::records::MergedRecord;
use crate::search::SearchCriteria;
use std::path::{Path, PathBuf};

/// Writes the catalogue in every configured format
///
/// # Arguments
///
/// * `config` - Output directory, format and optional contents directory
/// * `records` - The merged records
/// * `criteria` - The criteria sets the records came from, used for naming
///
/// # Returns
///
/// * `Ok(Vec<PathBuf>)` - Catalogue files written (contents files excluded)
/// * `Err(OutputError)` - A file could not be written
pub fn write_outputs(
    config: &OutputConfig,
    records: &[MergedRecord],
    criteria: &[SearchCriteria],
) -> OutputResult<Vec<PathBuf>> {
    if records.is_empty() {
        tracing::warn!("No records to save");
        return Ok(Vec::new());
    }

    let directory = Path::new(&config.directory);
    std::fs::create_dir_all(directory)?;

    let stem = output_stem(criteria);
    let mut handlers: Vec<Box<dyn OutputHandler>> = Vec::new();
    if config.format.writes_csv() {
        handlers.push(Box::new(CsvOutput));
    }
    if config.format.writes_json() {
        handlers.push(Box::new(JsonOutput));
    }

    let mut written = Vec::new();
    for handler in handlers {
        let path = directory.join(format!("{}.{}", stem, handler.extension()));
        handler.write(records, &path)?;
        tracing::info!("Saved {} record(s) to {}", records.len(), path.display());
        written.push(path);
    }

    if let Some(contents_dir) = &config.contents_directory {
        write_contents_files(records, Path::new(contents_dir))?;
    }

    Ok(written)
}
