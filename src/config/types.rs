use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Main configuration structure for Keyword-Scout
///
/// Every section and key is optional; omitted values take the defaults below.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    pub matching: MatchingConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub input: InputConfig,
    pub output: OutputConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Maximum number of concurrent page fetches within one site
    #[serde(rename = "max-concurrent-pages-open")]
    pub max_concurrent_pages_open: u32,

    /// Maximum number of sites crawled at the same time
    #[serde(rename = "max-concurrent-sites")]
    pub max_concurrent_sites: u32,

    /// Per-fetch timeout in seconds; a timed-out fetch is a failed page
    #[serde(rename = "fetch-timeout-secs")]
    pub fetch_timeout_secs: u64,

    /// TCP connect timeout in seconds
    #[serde(rename = "connect-timeout-secs")]
    pub connect_timeout_secs: u64,

    /// Maximum number of fetches per site
    #[serde(rename = "max-domain-requests")]
    pub max_domain_requests: u32,

    /// Maximum link depth from the site root (unlimited when absent)
    #[serde(rename = "max-depth")]
    pub max_depth: Option<u32>,
}

impl CrawlerConfig {
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_concurrent_pages_open: 4,
            max_concurrent_sites: 1,
            fetch_timeout_secs: 30,
            connect_timeout_secs: 10,
            max_domain_requests: 10_000,
            max_depth: None,
        }
    }
}

/// Keyword matching configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MatchingConfig {
    /// Accept an `s`/`es` suffix after a keyword
    #[serde(rename = "match-plurals")]
    pub match_plurals: bool,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            match_plurals: true,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: Option<String>,
}

impl UserAgentConfig {
    /// Formats the User-Agent header: `Name/Version (+ContactURL)`
    pub fn user_agent_string(&self) -> String {
        match &self.contact_url {
            Some(contact) => format!(
                "{}/{} (+{})",
                self.crawler_name, self.crawler_version, contact
            ),
            None => format!("{}/{}", self.crawler_name, self.crawler_version),
        }
    }
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "keyword-scout".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: None,
        }
    }
}

/// Input list locations
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Line-delimited list of site root URLs
    #[serde(rename = "websites-path")]
    pub websites_path: PathBuf,

    /// Line-delimited list of keywords
    #[serde(rename = "keywords-path")]
    pub keywords_path: PathBuf,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            websites_path: PathBuf::from("res/websites.txt"),
            keywords_path: PathBuf::from("res/keywords.txt"),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Path to the keyword report (CSV)
    #[serde(rename = "report-path")]
    pub report_path: PathBuf,

    /// Path to the run transcript
    #[serde(rename = "log-path")]
    pub log_path: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            report_path: PathBuf::from("res/results.csv"),
            log_path: PathBuf::from("res/log.txt"),
        }
    }
}
