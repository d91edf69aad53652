//! JSON catalogue writer

use crate::output::traits::{OutputHandler, OutputResult};
use crate::records::MergedRecord;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Writes all records as one pretty-printed JSON array
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonOutput;

impl JsonOutput {
    pub fn write_to<W: Write>(&self, records: &[MergedRecord], mut writer: W) -> OutputResult<()> {
        serde_json::to_writer_pretty(&mut writer, records)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    }
}

impl OutputHandler for JsonOutput {
    fn extension(&self) -> &'static str {
        "json"
    }

    fn write(&self, records: &[MergedRecord], path: &Path) -> OutputResult<()> {
        let file = BufWriter::new(File::create(path)?);
        self.write_to(records, file)
    }
}
