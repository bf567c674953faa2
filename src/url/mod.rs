//! URL handling module for Keyword-Scout
//!
//! This module provides href normalization, the canonical [`CrawlUrl`] type and
//! the [`Domain`] authority that scopes a site's crawl.

mod domain;
mod normalize;

pub use domain::Domain;
pub use normalize::{normalize, normalize_root};

use std::fmt;
use url::Url;

/// An absolute, canonical URL
///
/// Values are only built by [`normalize`] and [`normalize_root`], so two
/// `CrawlUrl`s that denote the same resource hold identical strings and compare
/// equal. The host is guaranteed to be present.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CrawlUrl {
    url: Url,
    domain: Domain,
}

impl CrawlUrl {
    /// Wraps an already-canonical URL; `None` if it has no host
    pub(crate) fn from_canonical(url: Url) -> Option<Self> {
        let domain = Domain::from_url(&url)?;
        Some(Self { url, domain })
    }

    /// Returns the canonical string form
    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }

    /// Returns the underlying parsed URL
    pub fn as_url(&self) -> &Url {
        &self.url
    }

    /// Returns the authority this URL belongs to
    pub fn domain(&self) -> &Domain {
        &self.domain
    }

    /// Returns true if this URL lives on the given domain
    pub fn is_on(&self, domain: &Domain) -> bool {
        self.domain == *domain
    }
}

impl fmt::Display for CrawlUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.url.as_str())
    }
}

impl AsRef<str> for CrawlUrl {
    fn as_ref(&self) -> &str {
        self.url.as_str()
    }
}
