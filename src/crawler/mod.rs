//! Crawler module for page fetching and interpretation
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching behind the `Fetch` trait
//! - Page classification, link filtering and record extraction
//! - The URL frontier and the concurrent page scheduler
//! - Single-item lookup

mod classifier;
mod document;
mod extractor;
mod fetcher;
mod frontier;
mod links;
mod pipeline;
mod scheduler;

pub use classifier::{classify, PageKind};
pub use document::Document;
pub use extractor::extract;
pub use fetcher::{build_http_client, Fetch, FetchError, HttpFetcher};
pub use frontier::Frontier;
pub use links::discover_links;
pub use pipeline::{interpret_page, PageOutcome};
pub use scheduler::{CrawlOptions, CrawlStats, RecordStream, Scheduler};

use crate::config::Config;
use crate::output::RecordSink;
use crate::record::Record;
use crate::schema::PageSchema;
use crate::CrawlerError;

/// Fetches and extracts a single app by its identifier
///
/// # Returns
///
/// * `Ok(Some(record))` - The detail page exists and yielded a record
/// * `Ok(None)` - The page does not exist or is not an app detail page
/// * `Err(CrawlerError::Fetch)` - The page could not be fetched
pub async fn lookup<F: Fetch + ?Sized>(
    fetcher: &F,
    schema: &PageSchema,
    id: &str,
) -> Result<Option<Record>, CrawlerError> {
    let url = schema.detail_url(id);
    tracing::debug!("Looking up {} at {}", id, url);

    match fetcher.fetch(&url).await {
        Ok(body) => Ok(interpret_page(&url, &body, schema).record),
        Err(FetchError::NotFound) => Ok(None),
        Err(source) => Err(CrawlerError::Fetch { url, source }),
    }
}

/// Runs a complete crawl, writing every record to `sink`
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Compile the page schema for the configured catalog
/// 2. Build the HTTP fetcher
/// 3. Crawl from the configured seed until the catalog is exhausted
/// 4. Write each record to the sink as it arrives
///
/// A sink error stops the crawl: no new pages are scheduled and the error is
/// returned once the in-flight pages have finished.
pub async fn crawl<S: RecordSink + ?Sized>(
    config: &Config,
    sink: &mut S,
) -> Result<CrawlStats, CrawlerError> {
    let schema = PageSchema::from_config(&config.catalog)?;
    let fetcher = HttpFetcher::from_config(config)?;
    let scheduler = Scheduler::new(fetcher, schema, CrawlOptions::from_config(&config.crawler));

    let mut stream = scheduler.run(&config.crawler.seed_url, config.crawler.concurrency as usize)?;

    while let Some(record) = stream.next().await {
        if let Err(e) = sink.write_record(&record) {
            tracing::error!("Failed to write record {}: {}", record.id, e);
            stream.finish().await;
            return Err(e.into());
        }
    }

    sink.finish()?;
    Ok(stream.finish().await)
}
