//! Market-Crawler main entry point
//!
//! This is the command-line interface for the app catalog crawler.

use anyhow::Context;
use chrono::Utc;
use clap::Parser;
use market_crawler::config::{load_config_with_hash, validate, Config};
use market_crawler::crawler::{crawl, lookup, HttpFetcher};
use market_crawler::output::{print_report, CrawlReport, JsonLinesWriter};
use market_crawler::PageSchema;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Market-Crawler: an app catalog crawler
///
/// Crawls the app catalog from a seed page, writing one JSON record per app
/// detail page to the destination file, or looks up a single app by its
/// identifier.
#[derive(Parser, Debug)]
#[command(name = "market-crawler")]
#[command(version)]
#[command(about = "Crawls an app catalog into JSON lines", long_about = None)]
struct Cli {
    /// File the JSON-lines records are written to (required for a crawl)
    #[arg(value_name = "DESTINATION")]
    destination: Option<PathBuf>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Fetch a single app by identifier and print it as JSON
    #[arg(long, value_name = "ID")]
    lookup: Option<String>,

    /// Maximum number of concurrent page tasks
    #[arg(long)]
    concurrency: Option<u32>,

    /// URL the crawl starts from
    #[arg(long, value_name = "URL")]
    seed: Option<String>,

    /// Result language sent to the catalog
    #[arg(long)]
    locale: Option<String>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = load_effective_config(&cli)?;

    if let Some(id) = cli.lookup.as_deref() {
        return handle_lookup(&config, id).await;
    }

    let Some(destination) = cli.destination.as_ref() else {
        tracing::error!("No destination file given; pass a path to write records to");
        std::process::exit(1);
    };

    handle_crawl(&config, destination, cli.quiet).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Logs go to stderr so stdout carries only lookup output.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("market_crawler=info,warn"),
            1 => EnvFilter::new("market_crawler=debug,info"),
            2 => EnvFilter::new("market_crawler=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the config file (if any) and applies command-line overrides
fn load_effective_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match cli.config.as_ref() {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("failed to load configuration from {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    if let Some(concurrency) = cli.concurrency {
        config.crawler.concurrency = concurrency;
    }
    if let Some(seed) = cli.seed.as_ref() {
        config.crawler.seed_url = seed.clone();
    }
    if let Some(locale) = cli.locale.as_ref() {
        config.catalog.locale = locale.clone();
    }

    validate(&config).context("invalid configuration")?;
    Ok(config)
}

/// Handles the --lookup mode: prints one record as pretty JSON
async fn handle_lookup(config: &Config, id: &str) -> anyhow::Result<()> {
    let schema = PageSchema::from_config(&config.catalog)?;
    let fetcher = HttpFetcher::from_config(config)?;

    match lookup(&fetcher, &schema, id).await? {
        Some(record) => {
            println!("{}", serde_json::to_string_pretty(&record)?);
            Ok(())
        }
        None => {
            tracing::info!("No app found with identifier {}", id);
            Ok(())
        }
    }
}

/// Handles the main crawl operation
async fn handle_crawl(config: &Config, destination: &Path, quiet: bool) -> anyhow::Result<()> {
    let mut writer = JsonLinesWriter::create(destination)
        .with_context(|| format!("failed to create {}", destination.display()))?;

    tracing::info!(
        "Crawling {} (locale {}) into {}",
        config.catalog.base_url,
        config.catalog.locale,
        destination.display()
    );

    let started_at = Utc::now();
    match crawl(config, &mut writer).await {
        Ok(stats) => {
            tracing::info!("Crawl completed: {} records written", writer.written());
            if !quiet {
                print_report(&CrawlReport::new(started_at, Utc::now(), stats));
            }
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn lookup_config(server: &MockServer) -> Config {
        let mut config = Config::default();
        config.catalog.base_url = format!("{}/store/apps", server.uri());
        config.http.timeout_secs = 5;
        config
    }

    #[tokio::test]
    async fn test_lookup_of_missing_app_succeeds() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;

        assert!(handle_lookup(&lookup_config(&server), "com.absent").await.is_ok());
    }

    #[tokio::test]
    async fn test_lookup_of_non_detail_page_succeeds() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html><body></body></html>"))
            .mount(&server)
            .await;

        assert!(handle_lookup(&lookup_config(&server), "com.a").await.is_ok());
    }

    #[tokio::test]
    async fn test_lookup_server_error_fails() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        assert!(handle_lookup(&lookup_config(&server), "com.a").await.is_err());
    }
}
