//! CSV catalogue writer

use crate::output::traits::{OutputHandler, OutputResult};
use crate::records::MergedRecord;
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Separator for list-valued columns
pub const LIST_SEPARATOR: &str = "; ";

/// One flat CSV row
#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    url: &'a str,
    title: &'a str,
    reference: &'a str,
    published_date: &'a str,
    last_updated: &'a str,
    document_type: String,
    programme: String,
    /// Chapter map as a JSON object, empty when contents are absent
    contents: String,
}

impl<'a> CsvRow<'a> {
    fn from_record(record: &'a MergedRecord) -> OutputResult<Self> {
        let contents = match &record.contents {
            Some(contents) => serde_json::to_string(contents)?,
            None => String::new(),
        };

        Ok(Self {
            url: &record.url,
            title: &record.title,
            reference: &record.reference,
            published_date: &record.published_date,
            last_updated: &record.last_updated,
            document_type: join_list(&record.document_types),
            programme: join_list(&record.programmes),
            contents,
        })
    }
}

fn join_list(values: &Option<Vec<String>>) -> String {
    values
        .as_deref()
        .map(|v| v.join(LIST_SEPARATOR))
        .unwrap_or_default()
}

/// Writes one row per record with a header line
#[derive(Debug, Default, Clone, Copy)]
pub struct CsvOutput;

impl CsvOutput {
    /// Writes the records to any writer
    pub fn write_to<W: Write>(&self, records: &[MergedRecord], writer: W) -> OutputResult<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        for record in records {
            csv_writer.serialize(CsvRow::from_record(record)?)?;
        }
        csv_writer.flush()?;
        Ok(())
    }
}

impl OutputHandler for CsvOutput {
    fn extension(&self) -> &'static str {
        "csv"
    }

    fn write(&self, records: &[MergedRecord], path: &Path) -> OutputResult<()> {
        let file = File::create(path)?;
        self.write_to(records, file)
    }
}
