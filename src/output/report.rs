//! CSV keyword report
//!
//! The report is a header line `Keyword, URL` followed by one row per hit, in
//! the order hits are recorded. Keywords and URLs are quoted by the `csv`
//! writer whenever they contain a delimiter or a quote.

use crate::keywords::KeywordHit;
use crate::output::traits::{HitSink, OutputError, OutputResult};
use std::fs::File;
use std::io::Write;
use std::path::Path;

const HEADER: [&str; 2] = ["Keyword", " URL"];

/// [`HitSink`] writing rows to a CSV file
#[derive(Debug)]
pub struct CsvReport<W: Write> {
    writer: csv::Writer<W>,
    rows: usize,
}

impl CsvReport<File> {
    /// Creates (or truncates) the report file and writes the header
    ///
    /// Missing parent directories are created.
    pub fn create(path: &Path) -> OutputResult<Self> {
        let create_error = |source| OutputError::Create {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(create_error)?;
        }

        let file = File::create(path).map_err(create_error)?;
        tracing::debug!("Writing report to {}", path.display());
        Self::from_writer(file)
    }
}

impl<W: Write> CsvReport<W> {
    /// Wraps a writer and emits the header row
    pub fn from_writer(inner: W) -> OutputResult<Self> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(inner);
        writer.write_record(HEADER)?;

        Ok(Self { writer, rows: 0 })
    }

    /// Number of hit rows written, header excluded
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Flushes and returns the underlying writer
    pub fn into_inner(self) -> OutputResult<W> {
        self.writer
            .into_inner()
            .map_err(|e| OutputError::Io(e.into_error()))
    }
}

impl<W: Write> HitSink for CsvReport<W> {
    fn record_hit(&mut self, hit: &KeywordHit) -> OutputResult<()> {
        let url = format!(" {}", hit.url);
        self.writer.write_record([hit.keyword.as_str(), url.as_str()])?;
        self.rows += 1;
        Ok(())
    }

    fn flush(&mut self) -> OutputResult<()> {
        self.writer.flush()?;
        Ok(())
    }
}
