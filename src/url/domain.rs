use std::fmt;
use url::Url;

/// The authority (host and optional port) of a site
///
/// All traversal and membership decisions for one site are scoped to a single
/// `Domain`. Default ports are not stored, so `http://ex.com:80` and
/// `http://ex.com` share a domain.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Domain {
    host: String,
    port: Option<u16>,
}

impl Domain {
    /// Extracts the domain from a URL
    ///
    /// The host is lowercased. Returns `None` if the URL has no host.
    ///
    /// # Examples
    ///
    /// ```
    /// use url::Url;
    /// use keyword_scout::Domain;
    ///
    /// let url = Url::parse("https://EXAMPLE.COM:8443/path").unwrap();
    /// let domain = Domain::from_url(&url).unwrap();
    /// assert_eq!(domain.to_string(), "example.com:8443");
    /// ```
    pub fn from_url(url: &Url) -> Option<Self> {
        url.host_str().map(|host| Self {
            host: host.to_lowercase(),
            port: url.port(),
        })
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.port {
            Some(port) => write!(f, "{}:{}", self.host, port),
            None => f.write_str(&self.host),
        }
    }
}
