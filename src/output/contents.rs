//! Per-record chapter contents files

use crate::output::naming::sanitize;
use crate::output::traits::OutputResult;
use crate::records::MergedRecord;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Writes one `<reference>.json` file per record that has contents
///
/// Records without a usable reference fall back to the last path segment of
/// their URL. Records with absent or empty contents are skipped.
///
/// # Returns
///
/// The paths written, in record order.
pub fn write_contents_files(records: &[MergedRecord], directory: &Path) -> OutputResult<Vec<PathBuf>> {
    fs::create_dir_all(directory)?;
    let mut written = Vec::new();

    for record in records {
        let Some(contents) = record.contents.as_ref().filter(|c| !c.is_empty()) else {
            continue;
        };

        let Some(name) = file_name(record) else {
            tracing::warn!("No usable file name for contents of {}", record.url);
            continue;
        };

        let path = directory.join(format!("{}.json", name));
        let mut file = BufWriter::new(File::create(&path)?);
        serde_json::to_writer_pretty(&mut file, contents)?;
        file.flush()?;

        written.push(path);
    }

    tracing::info!(
        "Wrote {} contents file(s) to {}",
        written.len(),
        directory.display()
    );
    Ok(written)
}

fn file_name(record: &MergedRecord) -> Option<String> {
    let reference = sanitize(&record.reference);
    if !reference.is_empty() {
        return Some(reference);
    }

    record
        .url
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .map(sanitize)
        .filter(|s| !s.is_empty() && !s.contains(':'))
}
