//! Crawler coordinator - run-level orchestration
//!
//! This module drives a whole run:
//! - Loading the website and keyword lists
//! - Crawling each site with a fresh frontier
//! - Streaming each site's hits into the report, in input order
//! - Aggregating and logging run statistics

use crate::config::Config;
use crate::crawler::engine::{CrawlSettings, SiteCrawler, SiteReport};
use crate::crawler::fetcher::HttpFetcher;
use crate::input::load_list;
use crate::keywords::KeywordMatcher;
use crate::output::{log_statistics, CrawlStatistics, CsvReport, HitSink, RunSummary};
use crate::url::normalize_root;
use crate::{PageError, ScoutError};
use chrono::Utc;
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use std::time::Instant;

/// Crawls a list of sites and feeds their hits to a sink
pub struct Coordinator {
    crawler: SiteCrawler,
    max_concurrent_sites: usize,
}

impl Coordinator {
    pub fn new(crawler: SiteCrawler, max_concurrent_sites: usize) -> Self {
        Self {
            crawler,
            max_concurrent_sites: max_concurrent_sites.max(1),
        }
    }

    /// Crawls every site and records its hits
    ///
    /// Sites may be crawled concurrently, but their hits reach the sink in the
    /// order the sites were listed, and the sink is flushed after each site. A
    /// site whose root URL is unusable is logged and skipped. Only a sink
    /// failure aborts the run. Statistics and run time are logged at the end.
    pub async fn run<S>(&self, sites: &[String], sink: &mut S) -> Result<RunSummary, ScoutError>
    where
        S: HitSink + ?Sized,
    {
        let started_at = Utc::now();
        let start = Instant::now();
        let mut statistics = CrawlStatistics::default();

        let mut reports = stream::iter(sites)
            .map(|site| self.crawl_site(site))
            .buffered(self.max_concurrent_sites);

        while let Some(outcome) = reports.next().await {
            match outcome {
                Ok(report) => {
                    for hit in &report.hits {
                        sink.record_hit(hit)?;
                    }
                    sink.flush()?;
                    statistics.record_site(&report);
                }
                Err(_) => statistics.record_skipped_site(),
            }
        }

        let summary = RunSummary {
            started_at,
            duration: start.elapsed(),
            statistics,
        };
        log_statistics(&summary);
        tracing::info!("Run time - {:.3} seconds", summary.duration.as_secs_f64());

        Ok(summary)
    }

    async fn crawl_site(&self, site: &str) -> Result<SiteReport, PageError> {
        let root = match normalize_root(site) {
            Ok(root) => root,
            Err(e) => {
                let error = PageError::MalformedUrl(e);
                tracing::error!("Error opening:\t{}: {}", site, error);
                return Err(error);
            }
        };

        tracing::info!("Starting site {} (domain {})", root, root.domain());
        Ok(self.crawler.crawl(root).await)
    }
}

/// Logs the sites and compiled keywords a run is about to use
fn log_run_banner(websites: &[String], matcher: &KeywordMatcher) {
    tracing::info!("Websites being used:");
    for site in websites {
        tracing::info!("\t- {}", site);
    }
    tracing::info!("Keywords being used ({}):", matcher.len());
    for keyword in matcher.keywords() {
        tracing::info!("\t- {}", keyword);
    }
}

/// Runs a complete keyword crawl
///
/// 1. Load the website and keyword lists
/// 2. Compile the keyword patterns
/// 3. Create the report file
/// 4. Crawl every site, writing hits as each site completes
/// 5. Log statistics and run time
///
/// A fatal error is logged before it is returned, so the transcript records
/// why the run stopped.
///
/// # Returns
///
/// * `Ok(RunSummary)` - Every site was attempted and the report is complete
/// * `Err(ScoutError)` - An input list, keyword, report or client error aborted the run
///
/// # Example
///
/// ```no_run
/// use keyword_scout::config::load_config;
/// use keyword_scout::crawler::run_crawl;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("scout.toml"))?;
/// let summary = run_crawl(config).await?;
/// println!("{} hits", summary.statistics.total_hits);
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: Config) -> crate::Result<RunSummary> {
    let result = crawl_with(config).await;
    if let Err(e) = &result {
        tracing::error!("Crawl aborted: {}", e);
    }
    result
}

async fn crawl_with(config: Config) -> crate::Result<RunSummary> {
    let websites = load_list(&config.input.websites_path)?;
    let keywords = load_list(&config.input.keywords_path)?;

    let matcher = KeywordMatcher::new(&keywords, config.matching.match_plurals)?;
    log_run_banner(&websites, &matcher);
    if matcher.is_empty() {
        tracing::warn!("No keywords to match; the report will only contain its header");
    }

    let mut report = CsvReport::create(&config.output.report_path)?;
    let fetcher = HttpFetcher::from_config(&config.user_agent, &config.crawler)?;

    let crawler = SiteCrawler::new(
        Arc::new(fetcher),
        Arc::new(matcher),
        CrawlSettings::from(&config.crawler),
    );
    let coordinator = Coordinator::new(crawler, config.crawler.max_concurrent_sites as usize);

    let summary = coordinator.run(&websites, &mut report).await?;
    tracing::info!(
        "Wrote {} rows to {}",
        report.rows(),
        config.output.report_path.display()
    );

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawler::fetcher::{FetchedPage, Fetcher};
    use crate::keywords::KeywordHit;
    use crate::logging::build_subscriber;
    use crate::logging::capture::CapturedLog;
    use crate::output::OutputResult;
    use crate::FetchError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use url::Url;

    /// Every host serves the same page mentioning its own host name
    #[derive(Default)]
    struct EchoFetcher {
        requests: AtomicUsize,
    }

    #[async_trait]
    impl Fetcher for EchoFetcher {
        async fn fetch(&self, url: &Url) -> Result<FetchedPage, FetchError> {
            self.requests.fetch_add(1, Ordering::SeqCst);
            let host = url.host_str().unwrap_or_default();
            Ok(FetchedPage {
                final_url: url.clone(),
                status: 200,
                content_type: "text/html".to_string(),
                body: format!(r#"<p>Welcome to {host}, home of the widget</p><a href="/">home</a>"#),
            })
        }
    }

    /// Serves a root page linking to a PDF and a missing page
    struct MixedSite;

    #[async_trait]
    impl Fetcher for MixedSite {
        async fn fetch(&self, url: &Url) -> Result<FetchedPage, FetchError> {
            let page = |content_type: &str, body: &str| FetchedPage {
                final_url: url.clone(),
                status: 200,
                content_type: content_type.to_string(),
                body: body.to_string(),
            };
            match url.path() {
                "/" => Ok(page(
                    "text/html",
                    r#"<p>widget</p><a href="/doc.pdf">doc</a><a href="/gone">gone</a>"#,
                )),
                "/doc.pdf" => Ok(page("application/pdf", "")),
                _ => Err(FetchError::Status { status: 404 }),
            }
        }
    }

    struct FailingSink;

    impl HitSink for FailingSink {
        fn record_hit(&mut self, _hit: &KeywordHit) -> OutputResult<()> {
            Err(std::io::Error::new(std::io::ErrorKind::Other, "disk full").into())
        }
    }

    fn coordinator(fetcher: Arc<EchoFetcher>, max_concurrent_sites: usize) -> Coordinator {
        let matcher = KeywordMatcher::new(["widget"], true).unwrap();
        let crawler = SiteCrawler::new(fetcher, Arc::new(matcher), CrawlSettings::default());
        Coordinator::new(crawler, max_concurrent_sites)
    }

    fn sites(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_hits_follow_site_order() {
        let fetcher = Arc::new(EchoFetcher::default());
        let mut hits: Vec<KeywordHit> = Vec::new();

        let summary = coordinator(fetcher, 3)
            .run(&sites(&["http://a.com", "http://b.com", "http://c.com"]), &mut hits)
            .await
            .unwrap();

        let urls: Vec<String> = hits.iter().map(|h| h.url.to_string()).collect();
        assert_eq!(urls, vec!["http://a.com/", "http://b.com/", "http://c.com/"]);
        assert_eq!(summary.statistics.sites_crawled, 3);
        assert_eq!(summary.statistics.total_hits, 3);
    }

    #[tokio::test]
    async fn test_invalid_root_is_skipped() {
        let fetcher = Arc::new(EchoFetcher::default());
        let mut hits: Vec<KeywordHit> = Vec::new();

        let summary = coordinator(fetcher.clone(), 1)
            .run(&sites(&["not a url", "ftp://files.com/", "http://b.com"]), &mut hits)
            .await
            .unwrap();

        assert_eq!(summary.statistics.sites_skipped, 2);
        assert_eq!(summary.statistics.sites_crawled, 1);
        assert_eq!(hits.len(), 1);
        assert_eq!(fetcher.requests.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_each_site_starts_with_fresh_state() {
        let fetcher = Arc::new(EchoFetcher::default());
        let mut hits: Vec<KeywordHit> = Vec::new();

        coordinator(fetcher.clone(), 1)
            .run(&sites(&["http://a.com", "http://a.com/"]), &mut hits)
            .await
            .unwrap();

        // The same root listed twice is crawled twice
        assert_eq!(fetcher.requests.load(Ordering::SeqCst), 2);
        assert_eq!(hits.len(), 2);
    }

    #[tokio::test]
    async fn test_statistics_fold_site_reports() {
        let fetcher = Arc::new(EchoFetcher::default());
        let mut hits: Vec<KeywordHit> = Vec::new();

        let summary = coordinator(fetcher, 2)
            .run(&sites(&["http://a.com", "http://b.com"]), &mut hits)
            .await
            .unwrap();

        let stats = &summary.statistics;
        assert_eq!(stats.total_pages, 2);
        assert_eq!(stats.pages_in(crate::state::PageState::VisitedHtml), 2);
        assert!((stats.success_rate() - 100.0).abs() < 0.01);
    }

    #[tokio::test]
    async fn test_sink_failure_aborts_run() {
        let fetcher = Arc::new(EchoFetcher::default());

        let result = coordinator(fetcher, 1)
            .run(&sites(&["http://a.com"]), &mut FailingSink)
            .await;

        assert!(matches!(result, Err(ScoutError::Output(_))));
    }

    #[tokio::test]
    async fn test_run_crawl_missing_website_list() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut config = Config::default();
        config.input.websites_path = dir.path().join("missing.txt");
        config.output.report_path = dir.path().join("results.csv");

        let result = run_crawl(config).await;
        assert!(matches!(result, Err(ScoutError::Input { .. })));
    }

    #[tokio::test]
    async fn test_empty_lists_write_header_only() {
        let dir = tempfile::TempDir::new().unwrap();
        let websites = dir.path().join("websites.txt");
        let keywords = dir.path().join("keywords.txt");
        std::fs::write(&websites, "\n").unwrap();
        std::fs::write(&keywords, "").unwrap();

        let mut config = Config::default();
        config.input.websites_path = websites;
        config.input.keywords_path = keywords;
        config.output.report_path = dir.path().join("results.csv");

        let summary = run_crawl(config.clone()).await.unwrap();
        assert_eq!(summary.statistics.sites_crawled, 0);

        let content = std::fs::read_to_string(&config.output.report_path).unwrap();
        assert_eq!(content, "Keyword, URL\n");
    }

    #[tokio::test]
    async fn test_transcript_records_run() {
        let log = CapturedLog::default();
        let _guard = tracing::subscriber::set_default(build_subscriber(None, Some(log.clone())));

        let matcher = KeywordMatcher::new(["widget"], true).unwrap();
        let crawler = SiteCrawler::new(
            Arc::new(MixedSite),
            Arc::new(matcher),
            CrawlSettings::default(),
        );
        let mut hits: Vec<KeywordHit> = Vec::new();
        Coordinator::new(crawler, 1)
            .run(&sites(&["not a url", "http://ex.com/"]), &mut hits)
            .await
            .unwrap();

        let transcript = log.contents();
        for line in [
            "Error opening:\tnot a url",
            "Crawling:\t\thttp://ex.com/\n",
            "Scraping:\t\thttp://ex.com/\n",
            "Error is type [application/pdf]:\t\thttp://ex.com/doc.pdf",
            "Error crawling:\thttp://ex.com/gone",
            "Run time - ",
        ] {
            assert!(transcript.contains(line), "missing {line:?} in:\n{transcript}");
        }
        assert!(!transcript.contains('\u{1b}'));
    }

    #[tokio::test]
    async fn test_fatal_error_reaches_transcript() {
        let log = CapturedLog::default();
        let _guard = tracing::subscriber::set_default(build_subscriber(None, Some(log.clone())));

        let dir = tempfile::TempDir::new().unwrap();
        let mut config = Config::default();
        config.input.websites_path = dir.path().join("missing.txt");
        config.output.report_path = dir.path().join("results.csv");

        assert!(run_crawl(config).await.is_err());

        let transcript = log.contents();
        assert!(transcript.contains("Crawl aborted: "));
        assert!(transcript.contains("missing.txt"));
    }
}
