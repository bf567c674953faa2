//! Output sink trait and error types
//!
//! Keyword hits are pushed into a [`HitSink`] as each site finishes; the sink
//! decides where they end up (the CSV report in production, a `Vec` in tests).

use crate::keywords::KeywordHit;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to create report {path}: {source}")]
    Create {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write report: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Destination for keyword hits
///
/// A failure here is fatal to the run: a report that silently drops rows is
/// worse than no report.
pub trait HitSink {
    /// Records one `(keyword, url)` hit
    fn record_hit(&mut self, hit: &KeywordHit) -> OutputResult<()>;

    /// Makes every hit recorded so far durable
    fn flush(&mut self) -> OutputResult<()> {
        Ok(())
    }
}

impl HitSink for Vec<KeywordHit> {
    fn record_hit(&mut self, hit: &KeywordHit) -> OutputResult<()> {
        self.push(hit.clone());
        Ok(())
    }
}
