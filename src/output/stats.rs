//! Run statistics
//!
//! Per-site reports are folded into a [`CrawlStatistics`] as the run
//! progresses; [`log_statistics`] writes the end-of-run summary to the log.

use crate::crawler::SiteReport;
use crate::state::PageState;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::time::Duration;

/// Crawl statistics summary
#[derive(Debug, Clone, Default)]
pub struct CrawlStatistics {
    /// Sites whose crawl ran to completion
    pub sites_crawled: u64,

    /// Sites skipped because their root URL was unusable
    pub sites_skipped: u64,

    /// Total number of pages fetched
    pub total_pages: u64,

    /// Count of pages by terminal state
    pub pages_by_state: HashMap<PageState, u64>,

    /// Total number of keyword hits reported
    pub total_hits: u64,

    /// Same-domain links added to a frontier
    pub links_enqueued: u64,

    /// Links dropped for pointing at another domain
    pub links_off_domain: u64,

    /// URLs left unfetched by the per-site request limit
    pub truncated: u64,
}

impl CrawlStatistics {
    /// Folds one finished site into the totals
    pub fn record_site(&mut self, report: &SiteReport) {
        self.sites_crawled += 1;
        self.total_pages += report.pages.len() as u64;
        for page in &report.pages {
            *self.pages_by_state.entry(page.state).or_insert(0) += 1;
        }
        self.total_hits += report.hits.len() as u64;
        self.links_enqueued += report.links.enqueued;
        self.links_off_domain += report.links.off_domain;
        self.truncated += report.truncated as u64;
    }

    pub fn record_skipped_site(&mut self) {
        self.sites_skipped += 1;
    }

    /// Returns the number of pages that ended in the given state
    pub fn pages_in(&self, state: PageState) -> u64 {
        self.pages_by_state.get(&state).copied().unwrap_or(0)
    }

    /// Returns the share of fetched pages that were scraped, as a percentage
    pub fn success_rate(&self) -> f64 {
        if self.total_pages == 0 {
            return 0.0;
        }
        (self.pages_in(PageState::VisitedHtml) as f64 / self.total_pages as f64) * 100.0
    }
}

/// Outcome of a complete run
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub started_at: DateTime<Utc>,
    pub duration: Duration,
    pub statistics: CrawlStatistics,
}

/// Logs the end-of-run statistics
pub fn log_statistics(summary: &RunSummary) {
    let stats = &summary.statistics;

    tracing::info!(
        "Run started {} finished: {} sites crawled, {} skipped",
        summary.started_at.to_rfc3339(),
        stats.sites_crawled,
        stats.sites_skipped
    );
    tracing::info!(
        "Pages fetched: {} ({} links followed, {} off-domain links ignored)",
        stats.total_pages,
        stats.links_enqueued,
        stats.links_off_domain
    );

    let mut state_counts: Vec<_> = stats.pages_by_state.iter().collect();
    state_counts.sort_by(|a, b| b.1.cmp(a.1).then(a.0.cmp(b.0)));
    for (state, count) in state_counts {
        tracing::info!("  {}: {}", state, count);
    }

    if stats.truncated > 0 {
        tracing::warn!(
            "{} URLs were left unfetched by the request limit",
            stats.truncated
        );
    }

    tracing::info!(
        "Keyword hits: {} (success rate {:.1}%)",
        stats.total_hits,
        stats.success_rate()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pages_in_missing_state() {
        let stats = CrawlStatistics::default();
        assert_eq!(stats.pages_in(PageState::Failed), 0);
    }

    #[test]
    fn test_success_rate() {
        let mut stats = CrawlStatistics {
            total_pages: 10,
            ..CrawlStatistics::default()
        };
        stats.pages_by_state.insert(PageState::VisitedHtml, 8);
        stats.pages_by_state.insert(PageState::Failed, 2);

        assert!((stats.success_rate() - 80.0).abs() < 0.01);
    }

    #[test]
    fn test_success_rate_zero_pages() {
        assert_eq!(CrawlStatistics::default().success_rate(), 0.0);
    }

    #[test]
    fn test_skipped_sites_counted() {
        let mut stats = CrawlStatistics::default();
        stats.record_skipped_site();
        stats.record_skipped_site();
        assert_eq!(stats.sites_skipped, 2);
        assert_eq!(stats.sites_crawled, 0);
    }
}
