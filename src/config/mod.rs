//! Configuration module for Market-Crawler
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! All keys are optional; `Config::default()` describes a crawl of the public
//! catalog with ten concurrent tasks.
//!
//! # Example
//!
//! ```no_run
//! use market_crawler::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("crawler.toml")).unwrap();
//! println!("Crawler will use concurrency: {}", config.crawler.concurrency);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    CatalogConfig, Config, CrawlerConfig, HttpConfig, DEFAULT_BASE_URL, DEFAULT_SEED_URL,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
pub use validation::validate;
