//! Keyword-Scout: a domain-scoped keyword crawler
//!
//! This crate crawls each configured website within its own domain, extracts the
//! visible text of every HTML page it reaches, and reports which keywords appear
//! on which pages.

pub mod config;
pub mod crawler;
pub mod input;
pub mod keywords;
pub mod logging;
pub mod output;
pub mod state;
pub mod url;

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Main error type for Keyword-Scout operations
///
/// Every variant here aborts the whole run. Per-page problems are reported
/// through [`PageError`] and never reach this type.
#[derive(Debug, Error)]
pub enum ScoutError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to read input list {path}: {source}")]
    Input {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Keyword error: {0}")]
    Keyword(#[from] KeywordError),

    #[error("Report error: {0}")]
    Output(#[from] output::OutputError),

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL normalization outcomes that do not produce a crawlable URL
///
/// The first group are deliberate skips (links that are not navigation or
/// cannot be tied to a concrete origin). The second group are malformed input.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UrlError {
    #[error("Empty href")]
    Empty,

    #[error("Fragment-only href: {0}")]
    FragmentOnly(String),

    #[error("Protocol-relative href: {0}")]
    ProtocolRelative(String),

    #[error("Unsupported URL scheme: {0}")]
    UnsupportedScheme(String),

    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Missing host in URL: {0}")]
    MissingHost(String),
}

impl UrlError {
    /// Returns true for hrefs that are skipped on purpose rather than malformed
    pub fn is_skip(&self) -> bool {
        matches!(
            self,
            Self::Empty | Self::FragmentOnly(_) | Self::ProtocolRelative(_) | Self::UnsupportedScheme(_)
        )
    }
}

/// Transport-level failures reported by a [`crawler::Fetcher`]
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Request timeout after {after:?}")]
    Timeout { after: Duration },

    #[error("HTTP {status}")]
    Status { status: u16 },

    #[error("Connection failed: {0}")]
    Connect(String),

    #[error("Transport error: {0}")]
    Transport(String),
}

/// Recoverable per-URL failures
///
/// The engine logs these, marks the URL terminal and moves on.
#[derive(Debug, Error)]
pub enum PageError {
    #[error("Fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("Unsupported content type [{content_type}]")]
    UnsupportedContentType { content_type: String },

    #[error("Malformed URL: {0}")]
    MalformedUrl(#[from] UrlError),

    #[error("Fetch task panicked: {0}")]
    Panicked(String),
}

/// Keyword pattern errors
#[derive(Debug, Error)]
pub enum KeywordError {
    #[error("Invalid keyword pattern for '{keyword}': {source}")]
    Pattern {
        keyword: String,
        source: regex::Error,
    },
}

/// Result type alias for Keyword-Scout operations
pub type Result<T> = std::result::Result<T, ScoutError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{run_crawl, Fetcher, HttpFetcher, SiteCrawler, SiteReport};
pub use keywords::{KeywordHit, KeywordMatcher};
pub use state::PageState;
pub use crate::url::{normalize, normalize_root, CrawlUrl, Domain};
