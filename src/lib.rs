//! Market-Crawler: an app catalog crawler
//!
//! This crate walks a linked app catalog starting from a single seed page,
//! classifies every fetched page, extracts one structured record per app
//! detail page, and follows item and publisher links until the reachable
//! relevant part of the catalog is exhausted.

pub mod config;
pub mod crawler;
pub mod output;
pub mod record;
pub mod schema;
pub mod url;

use thiserror::Error;

/// Main error type for Market-Crawler operations
#[derive(Debug, Error)]
pub enum CrawlerError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("Fetch failed for {url}: {source}")]
    Fetch {
        url: String,
        source: crawler::FetchError,
    },

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Page schema error: {0}")]
    Schema(#[from] schema::SchemaError),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing domain in URL")]
    MissingDomain,
}

// Re-export commonly used types
pub use config::Config;
pub use crawler::{
    crawl, lookup, CrawlOptions, CrawlStats, Fetch, FetchError, HttpFetcher, RecordStream,
    Scheduler,
};
pub use output::{JsonLinesWriter, RecordSink};
pub use record::{Price, Record};
pub use schema::PageSchema;
pub use url::{normalize_url, query_params, QueryParams};
