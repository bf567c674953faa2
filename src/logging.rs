//! Console and transcript logging
//!
//! The console follows the CLI verbosity flags. The run transcript is a second,
//! plain-text layer that always records the run at info level.

use std::fs::File;
use std::path::Path;
use std::sync::Mutex;
use tracing::Subscriber;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

/// Filter for the transcript, independent of console verbosity
pub const TRANSCRIPT_FILTER: &str = "keyword_scout=info,warn";

/// Console filter for the `-v`/`-q` flags
pub fn console_filter(verbose: u8, quiet: bool) -> EnvFilter {
    if quiet {
        // Only show errors
        return EnvFilter::new("error");
    }

    match verbose {
        0 => EnvFilter::new("keyword_scout=info,warn"),
        1 => EnvFilter::new("keyword_scout=debug,info"),
        2 => EnvFilter::new("keyword_scout=trace,debug"),
        _ => EnvFilter::new("trace"),
    }
}

/// Builds a subscriber from an optional console filter and transcript writer
pub fn build_subscriber<W>(
    console: Option<EnvFilter>,
    transcript: Option<W>,
) -> impl Subscriber + Send + Sync + 'static
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let console_layer = console.map(|filter| {
        fmt::layer()
            .with_target(false)
            .with_thread_ids(false)
            .with_file(false)
            .with_filter(filter)
    });

    let transcript_layer = transcript.map(|writer| {
        fmt::layer()
            .with_writer(writer)
            .with_ansi(false)
            .with_target(false)
            .with_filter(EnvFilter::new(TRANSCRIPT_FILTER))
    });

    tracing_subscriber::registry()
        .with(console_layer)
        .with(transcript_layer)
}

/// Installs the global subscriber
///
/// A log file that cannot be opened only costs the transcript, never the run.
pub fn init(verbose: u8, quiet: bool, log_path: Option<&Path>) {
    let (log_file, log_error) = match log_path.map(open_log_file) {
        Some(Ok(file)) => (Some(Mutex::new(file)), None),
        Some(Err(e)) => (None, Some(e)),
        None => (None, None),
    };

    build_subscriber(Some(console_filter(verbose, quiet)), log_file).init();

    if let (Some(path), Some(e)) = (log_path, log_error) {
        tracing::warn!(
            "Error opening:\t{}: {}; continuing without a log file",
            path.display(),
            e
        );
    }
}

fn open_log_file(path: &Path) -> std::io::Result<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    File::create(path)
}
