use crate::traits::CSVWrite;
use anyhow::{Context as _, Result};
use csv::{Writer, WriterBuilder};
use serde::Serialize;
use std::{
    fs::{self, File},
    io::Write,
    path::Path,
};

/// Writes tables with an explicit header row, so a table with no data rows
/// still carries its column labels.
pub struct TableCSVWriter<W: Write> {
    writer: Writer<W>,
}

impl TableCSVWriter<File> {
    pub fn create(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let file =
            File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
        Ok(Self::from_writer(file))
    }
}

impl<W: Write> TableCSVWriter<W> {
    pub fn from_writer(inner: W) -> Self {
        TableCSVWriter {
            writer: WriterBuilder::new().has_headers(false).from_writer(inner),
        }
    }
}

impl<W: Write> CSVWrite for TableCSVWriter<W> {
    fn write_header(&mut self, labels: &[&str]) -> Result<()> {
        Ok(self.writer.write_record(labels)?)
    }

    fn write_record<T: Serialize>(&mut self, record: &T) -> Result<()> {
        Ok(self.writer.serialize(record)?)
    }

    fn flush(&mut self) -> Result<()> {
        Ok(self.writer.flush()?)
    }
}
