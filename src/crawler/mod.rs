//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching behind the [`Fetcher`] trait
//! - HTML parsing into hrefs and visible text
//! - Per-site frontier and visited-set bookkeeping
//! - The bounded-concurrency site crawl and run-level coordination

mod coordinator;
mod engine;
mod fetcher;
mod frontier;
mod parser;

pub use coordinator::{run_crawl, Coordinator};
pub use engine::{CrawlSettings, LinkStats, PageRecord, SiteCrawler, SiteReport};
pub use fetcher::{build_http_client, is_html, FetchedPage, Fetcher, HttpFetcher};
pub use frontier::{Admission, Frontier, QueuedUrl};
pub use parser::{parse_html, ParsedPage};
