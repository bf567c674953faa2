//! Per-site crawl engine
//!
//! One [`SiteCrawler::crawl`] call walks a single site breadth-first. The engine
//! task is the only owner of the frontier; fetches run on a bounded set of
//! spawned tasks and report back through a [`JoinSet`], so claiming a URL and
//! recording its outcome never race.
//!
//! Finished fetches are applied in claim order, not completion order. A slow
//! page holds back the pages claimed after it, so links are harvested and hits
//! reported in the same order whatever the network timing.

use crate::config::CrawlerConfig;
use crate::crawler::fetcher::{is_html, Fetcher};
use crate::crawler::frontier::{Admission, Frontier, QueuedUrl};
use crate::crawler::parser::{parse_html, ParsedPage};
use crate::keywords::{KeywordHit, KeywordMatcher};
use crate::state::PageState;
use crate::url::{normalize, CrawlUrl, Domain};
use crate::{FetchError, PageError};
use futures::FutureExt;
use std::any::Any;
use std::collections::{BTreeMap, HashSet};
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinSet;
use url::Url;

/// Limits applied to each site's crawl
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlSettings {
    /// Maximum number of fetches in flight at once
    pub max_concurrent_pages_open: usize,

    /// Deadline for a single page fetch, body included
    pub fetch_timeout: Duration,

    /// Maximum number of pages fetched per site
    pub max_domain_requests: usize,

    /// Maximum link distance from the root, unbounded when `None`
    pub max_depth: Option<u32>,
}

impl From<&CrawlerConfig> for CrawlSettings {
    fn from(config: &CrawlerConfig) -> Self {
        Self {
            max_concurrent_pages_open: config.max_concurrent_pages_open.max(1) as usize,
            fetch_timeout: config.fetch_timeout(),
            max_domain_requests: config.max_domain_requests as usize,
            max_depth: config.max_depth,
        }
    }
}

impl Default for CrawlSettings {
    fn default() -> Self {
        Self::from(&CrawlerConfig::default())
    }
}

/// Final state of one fetched page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRecord {
    pub url: CrawlUrl,
    pub state: PageState,
    pub depth: u32,
}

/// What happened to the links harvested from a site's pages
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinkStats {
    /// New same-domain URLs added to the frontier
    pub enqueued: u64,

    /// URLs already queued or visited
    pub duplicate: u64,

    /// URLs on another domain
    pub off_domain: u64,

    /// Fragment-only, protocol-relative, non-http and empty hrefs
    pub skipped: u64,

    /// Hrefs that could not be resolved into a URL
    pub malformed: u64,

    /// URLs beyond the configured depth limit
    pub too_deep: u64,
}

/// Result of crawling one site
#[derive(Debug, Clone)]
pub struct SiteReport {
    /// Canonical root URL the crawl started from
    pub root: CrawlUrl,

    /// Domain the crawl was scoped to
    pub domain: Domain,

    /// Every fetched page with its terminal state, in traversal order
    pub pages: Vec<PageRecord>,

    /// Keyword hits, in page traversal order
    pub hits: Vec<KeywordHit>,

    /// Link harvesting counters
    pub links: LinkStats,

    /// URLs left unfetched because the request limit was reached
    pub truncated: usize,

    /// Wall-clock time spent on the site
    pub duration: Duration,
}

impl SiteReport {
    fn new(root: CrawlUrl) -> Self {
        Self {
            domain: root.domain().clone(),
            root,
            pages: Vec::new(),
            hits: Vec::new(),
            links: LinkStats::default(),
            truncated: 0,
            duration: Duration::ZERO,
        }
    }

    /// Returns the set of URLs that were fetched
    pub fn visited_urls(&self) -> HashSet<&CrawlUrl> {
        self.pages.iter().map(|page| &page.url).collect()
    }

    /// Counts pages that ended in the given state
    pub fn count(&self, state: PageState) -> usize {
        self.pages.iter().filter(|page| page.state == state).count()
    }
}

/// An HTML page ready for link harvesting and matching
struct Document {
    final_url: Url,
    parsed: ParsedPage,
}

/// Outcome of one fetch task, tagged with its claim sequence number
struct Visit {
    seq: u64,
    outcome: Result<Document, PageError>,
}

/// Crawls one site at a time within its root's domain
pub struct SiteCrawler {
    fetcher: Arc<dyn Fetcher>,
    matcher: Arc<KeywordMatcher>,
    settings: CrawlSettings,
}

impl SiteCrawler {
    pub fn new(
        fetcher: Arc<dyn Fetcher>,
        matcher: Arc<KeywordMatcher>,
        settings: CrawlSettings,
    ) -> Self {
        Self {
            fetcher,
            matcher,
            settings,
        }
    }

    /// Crawls the site rooted at `root` until its frontier is exhausted
    ///
    /// Every same-domain URL reachable from the root is fetched at most once.
    /// Per-page failures are logged and recorded in the report; they never stop
    /// the crawl.
    pub async fn crawl(&self, root: CrawlUrl) -> SiteReport {
        let start = Instant::now();
        let mut report = SiteReport::new(root.clone());
        let mut frontier = Frontier::new(root);
        let mut in_flight: JoinSet<Visit> = JoinSet::new();

        // Claimed URLs and finished outcomes, both keyed by claim sequence
        let mut claims: BTreeMap<u64, QueuedUrl> = BTreeMap::new();
        let mut finished: BTreeMap<u64, Result<Document, PageError>> = BTreeMap::new();
        let mut next_seq = 0u64;
        let mut dispatched = 0u64;

        loop {
            while in_flight.len() < self.settings.max_concurrent_pages_open
                && (dispatched as usize) < self.settings.max_domain_requests
            {
                let Some(queued) = frontier.claim() else {
                    break;
                };
                in_flight.spawn(visit(
                    Arc::clone(&self.fetcher),
                    dispatched,
                    queued.url.clone(),
                    self.settings.fetch_timeout,
                ));
                claims.insert(dispatched, queued);
                dispatched += 1;
            }

            tracing::trace!(
                "{}: {} queued, {} in flight",
                report.domain,
                frontier.pending(),
                frontier.in_flight()
            );

            let Some(joined) = in_flight.join_next().await else {
                break;
            };

            match joined {
                Ok(visit) => {
                    finished.insert(visit.seq, visit.outcome);
                }
                Err(e) => tracing::error!("Fetch task for {} failed: {}", report.domain, e),
            }

            while let Some(outcome) = finished.remove(&next_seq) {
                if let Some(queued) = claims.remove(&next_seq) {
                    self.record(&mut frontier, &mut report, queued, outcome);
                }
                next_seq += 1;
            }
        }

        // Only reached when a fetch task was lost before reporting back
        for (seq, queued) in std::mem::take(&mut claims) {
            match finished.remove(&seq) {
                Some(outcome) => self.record(&mut frontier, &mut report, queued, outcome),
                None => {
                    tracing::warn!("Error crawling:\t{}: fetch task lost", queued.url);
                    frontier.complete(&queued.url, PageState::Failed);
                    report.pages.push(PageRecord {
                        url: queued.url,
                        state: PageState::Failed,
                        depth: queued.depth,
                    });
                }
            }
        }

        report.truncated = frontier.discard_pending();
        if report.truncated > 0 {
            tracing::warn!(
                "Request limit of {} reached for {}; {} URLs left unfetched",
                self.settings.max_domain_requests,
                report.domain,
                report.truncated
            );
        }

        report.duration = start.elapsed();
        tracing::info!(
            "Finished {}: {} pages ({} html, {} non-html, {} failed), {} hits in {:.2?}",
            report.domain,
            report.visited_urls().len(),
            report.count(PageState::VisitedHtml),
            report.count(PageState::VisitedNonHtml),
            report.count(PageState::Failed),
            report.hits.len(),
            report.duration
        );

        report
    }

    /// Applies a finished fetch to the frontier and the report
    fn record(
        &self,
        frontier: &mut Frontier,
        report: &mut SiteReport,
        queued: QueuedUrl,
        outcome: Result<Document, PageError>,
    ) {
        let state = match outcome {
            Ok(document) => {
                tracing::info!("Crawling:\t\t{}", queued.url);
                self.harvest_links(frontier, report, &queued, &document);

                tracing::info!("Scraping:\t\t{}", queued.url);
                report
                    .hits
                    .extend(self.matcher.match_page(&queued.url, &document.parsed.text));

                PageState::VisitedHtml
            }
            Err(PageError::UnsupportedContentType { content_type }) => {
                tracing::warn!("Error is type [{}]:\t\t{}", content_type, queued.url);
                PageState::VisitedNonHtml
            }
            Err(e) => {
                tracing::warn!("Error crawling:\t{}: {}", queued.url, e);
                PageState::Failed
            }
        };

        if !frontier.complete(&queued.url, state) {
            tracing::debug!("Ignoring duplicate completion of {}", queued.url);
            return;
        }

        report.pages.push(PageRecord {
            url: queued.url,
            state,
            depth: queued.depth,
        });
    }

    /// Resolves a page's hrefs and offers the same-domain ones to the frontier
    fn harvest_links(
        &self,
        frontier: &mut Frontier,
        report: &mut SiteReport,
        queued: &QueuedUrl,
        document: &Document,
    ) {
        let depth = queued.depth + 1;

        for href in &document.parsed.hrefs {
            let link = match normalize(href, &document.final_url) {
                Ok(link) => link,
                Err(e) if e.is_skip() => {
                    tracing::trace!("Skipping link on {}: {}", queued.url, e);
                    report.links.skipped += 1;
                    continue;
                }
                Err(e) => {
                    tracing::debug!("{} on {}", PageError::MalformedUrl(e), queued.url);
                    report.links.malformed += 1;
                    continue;
                }
            };

            if !link.is_on(frontier.domain()) {
                report.links.off_domain += 1;
                continue;
            }

            if self.settings.max_depth.is_some_and(|max| depth > max) {
                report.links.too_deep += 1;
                continue;
            }

            match frontier.push(link, depth) {
                Admission::Enqueued => report.links.enqueued += 1,
                Admission::AlreadySeen => report.links.duplicate += 1,
                Admission::OffDomain => report.links.off_domain += 1,
            }
        }
    }
}

/// Runs one fetch task
///
/// A panic inside the fetcher or the parser fails only this page.
async fn visit(fetcher: Arc<dyn Fetcher>, seq: u64, url: CrawlUrl, timeout: Duration) -> Visit {
    let outcome = AssertUnwindSafe(fetch_document(fetcher.as_ref(), &url, timeout))
        .catch_unwind()
        .await
        .unwrap_or_else(|panic| Err(PageError::Panicked(panic_message(&*panic))));

    Visit { seq, outcome }
}

/// Fetches and parses one page under the fetch deadline
///
/// The parsed DOM never crosses an await point; only the extracted hrefs and
/// text leave this function.
async fn fetch_document(
    fetcher: &dyn Fetcher,
    url: &CrawlUrl,
    timeout: Duration,
) -> Result<Document, PageError> {
    tracing::debug!("Fetching {}", url);

    match tokio::time::timeout(timeout, fetcher.fetch(url.as_url())).await {
        Err(_) => Err(PageError::Fetch(FetchError::Timeout { after: timeout })),
        Ok(Err(e)) => Err(PageError::Fetch(e)),
        Ok(Ok(page)) if !is_html(&page.content_type) => Err(PageError::UnsupportedContentType {
            content_type: page.content_type,
        }),
        Ok(Ok(page)) => Ok(Document {
            parsed: parse_html(&page.body),
            final_url: page.final_url,
        }),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
