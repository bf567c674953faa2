//! Configuration module for Keyword-Scout
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every key has a default, so running without a file is equivalent to an empty one.
//!
//! # Example
//!
//! ```no_run
//! use keyword_scout::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("scout.toml")).unwrap();
//! println!("Report goes to: {}", config.output.report_path.display());
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, CrawlerConfig, InputConfig, MatchingConfig, OutputConfig, UserAgentConfig,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;
