use crate::config::types::{Config, CrawlerConfig, InputConfig, OutputConfig, UserAgentConfig};
use crate::ConfigError;
use std::ops::RangeInclusive;
use std::path::Path;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_input_config(&config.input)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates the `[crawler]` section
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    require_range(
        "crawler.max-concurrent-pages-open",
        config.max_concurrent_pages_open.into(),
        1..=100,
    )?;
    require_range(
        "crawler.max-concurrent-sites",
        config.max_concurrent_sites.into(),
        1..=16,
    )?;
    require_range("crawler.fetch-timeout-secs", config.fetch_timeout_secs, 1..=u64::MAX)?;
    require_range("crawler.connect-timeout-secs", config.connect_timeout_secs, 1..=u64::MAX)?;
    require_range(
        "crawler.max-domain-requests",
        config.max_domain_requests.into(),
        1..=u64::MAX,
    )?;
    Ok(())
}

fn require_range(key: &str, value: u64, range: RangeInclusive<u64>) -> Result<(), ConfigError> {
    if range.contains(&value) {
        return Ok(());
    }

    let message = if *range.end() == u64::MAX {
        format!("{} must be at least {}, got {}", key, range.start(), value)
    } else {
        format!(
            "{} must be between {} and {}, got {}",
            key,
            range.start(),
            range.end(),
            value
        )
    };
    Err(ConfigError::Validation(message))
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    // The name is the product token of the User-Agent header
    let name = &config.crawler_name;
    if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
        return Err(ConfigError::Validation(format!(
            "user-agent.crawler-name must be non-empty ASCII letters, digits and hyphens, got '{}'",
            name
        )));
    }

    if config.crawler_version.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent.crawler-version cannot be empty".to_string(),
        ));
    }

    if let Some(contact_url) = &config.contact_url {
        let url = Url::parse(contact_url)
            .map_err(|e| ConfigError::InvalidUrl(format!("user-agent.contact-url: {}", e)))?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ConfigError::InvalidUrl(format!(
                "user-agent.contact-url '{}' must be an http(s) URL",
                contact_url
            )));
        }
    }

    Ok(())
}

fn validate_input_config(config: &InputConfig) -> Result<(), ConfigError> {
    require_path("input.websites-path", &config.websites_path)?;
    require_path("input.keywords-path", &config.keywords_path)
}

fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    require_path("output.report-path", &config.report_path)?;
    require_path("output.log-path", &config.log_path)
}

fn require_path(key: &str, path: &Path) -> Result<(), ConfigError> {
    if path.as_os_str().is_empty() {
        return Err(ConfigError::Validation(format!("{} cannot be empty", key)));
    }
    Ok(())
}
