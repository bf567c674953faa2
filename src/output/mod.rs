//! Output module for keyword reports and run statistics
//!
//! This module handles:
//! - The CSV report of `(keyword, url)` hits
//! - The [`HitSink`] seam the crawler writes hits through
//! - Aggregating and logging run statistics

mod report;
pub mod stats;
mod traits;

pub use report::CsvReport;
pub use stats::{log_statistics, CrawlStatistics, RunSummary};
pub use traits::{HitSink, OutputError, OutputResult};
