/// Page state definitions for tracking crawl progress
///
/// Every URL of a site's crawl moves `Queued → Fetching → terminal` exactly once.
use std::fmt;

/// Represents the current state of a page in the crawl process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PageState {
    // ===== Active States =====
    /// Page is in the frontier waiting to be fetched
    Queued,

    /// Page has been claimed by a fetch worker
    Fetching,

    // ===== Terminal States =====
    /// Page was fetched as HTML; its links were harvested and its text matched
    VisitedHtml,

    /// Page was fetched but its Content-Type is not HTML; recorded, not scraped
    VisitedNonHtml,

    /// Fetch failed (network error, HTTP error status or timeout); never retried
    Failed,
}

impl PageState {
    /// Returns true if this is a terminal state (no further processing needed)
    pub fn is_terminal(&self) -> bool {
        !self.is_active()
    }

    /// Returns true if this is an active state (page may still be processed)
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Queued | Self::Fetching)
    }

    /// Returns true if the page counts as visited
    ///
    /// A claimed page is visited from the moment a worker takes it, which is what
    /// keeps it from ever being fetched a second time.
    pub fn is_visited(&self) -> bool {
        !matches!(self, Self::Queued)
    }

    /// Converts the page state to its string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Queued => "queued",
            Self::Fetching => "fetching",
            Self::VisitedHtml => "visited_html",
            Self::VisitedNonHtml => "visited_non_html",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for PageState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
