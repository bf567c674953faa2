//! Keyword-Scout main entry point
//!
//! This is the command-line interface for the Keyword-Scout keyword crawler.

use anyhow::Context;
use clap::Parser;
use keyword_scout::config::{load_config_with_hash, Config};
use keyword_scout::crawler::run_crawl;
use keyword_scout::input::load_list;
use keyword_scout::{logging, normalize_root};
use std::path::PathBuf;

/// Keyword-Scout: a domain-scoped keyword crawler
///
/// Keyword-Scout crawls every website in its list without leaving the site's
/// domain, and reports which keywords appear on which pages.
#[derive(Parser, Debug)]
#[command(name = "keyword-scout")]
#[command(version)]
#[command(about = "A domain-scoped keyword crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults apply when omitted)
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Website list to crawl, one root URL per line
    #[arg(long, value_name = "PATH")]
    websites: Option<PathBuf>,

    /// Keyword list to match, one keyword per line
    #[arg(long, value_name = "PATH")]
    keywords: Option<PathBuf>,

    /// Where to write the CSV report
    #[arg(long, value_name = "PATH")]
    report: Option<PathBuf>,

    /// Where to write the run transcript
    #[arg(long, value_name = "PATH")]
    log: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and inputs and show what would be crawled without crawling
    #[arg(long)]
    dry_run: bool,
}

impl Cli {
    /// Applies command-line path overrides on top of the loaded configuration
    fn apply_overrides(&self, config: &mut Config) {
        if let Some(path) = &self.websites {
            config.input.websites_path = path.clone();
        }
        if let Some(path) = &self.keywords {
            config.input.keywords_path = path.clone();
        }
        if let Some(path) = &self.report {
            config.output.report_path = path.clone();
        }
        if let Some(path) = &self.log {
            config.output.log_path = path.clone();
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let (mut config, config_hash) = match &cli.config {
        Some(path) => {
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
            (config, Some(hash))
        }
        None => (Config::default(), None),
    };
    cli.apply_overrides(&mut config);

    if cli.dry_run {
        logging::init(cli.verbose, cli.quiet, None);
        return handle_dry_run(&config);
    }

    logging::init(cli.verbose, cli.quiet, Some(&config.output.log_path));

    match (&cli.config, &config_hash) {
        (Some(path), Some(hash)) => {
            tracing::info!("Configuration loaded from {} (hash: {})", path.display(), hash)
        }
        _ => tracing::info!("No configuration file given, using defaults"),
    }

    // run_crawl logs the failure to the transcript before returning it
    run_crawl(config).await.context("Crawl aborted")?;
    Ok(())
}

/// Handles the --dry-run mode: validates config and inputs, shows what would be crawled
fn handle_dry_run(config: &Config) -> anyhow::Result<()> {
    let websites = load_list(&config.input.websites_path)?;
    let keywords = load_list(&config.input.keywords_path)?;

    println!("=== Keyword-Scout Dry Run ===\n");

    println!("Crawler Configuration:");
    println!(
        "  Max concurrent pages: {}",
        config.crawler.max_concurrent_pages_open
    );
    println!("  Max concurrent sites: {}", config.crawler.max_concurrent_sites);
    println!("  Fetch timeout: {}s", config.crawler.fetch_timeout_secs);
    println!(
        "  Max domain requests: {}",
        config.crawler.max_domain_requests
    );
    match config.crawler.max_depth {
        Some(depth) => println!("  Max depth: {}", depth),
        None => println!("  Max depth: unlimited"),
    }
    println!("  Match plurals: {}", config.matching.match_plurals);

    println!("\nUser Agent: {}", config.user_agent.user_agent_string());

    println!("\nOutput:");
    println!("  Report: {}", config.output.report_path.display());
    println!("  Log: {}", config.output.log_path.display());

    let mut crawlable = 0;
    println!("\nWebsites ({}):", websites.len());
    for site in &websites {
        match normalize_root(site) {
            Ok(root) => {
                crawlable += 1;
                println!("  - {} (domain {})", root, root.domain());
            }
            Err(e) => println!("  ! {} would be skipped: {}", site, e),
        }
    }

    println!("\nKeywords ({}):", keywords.len());
    for keyword in &keywords {
        println!("  - {}", keyword);
    }

    println!("\n✓ Configuration is valid");
    println!("✓ Would crawl {} of {} websites", crawlable, websites.len());

    Ok(())
}
