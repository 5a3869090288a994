//! Crawl scheduler
//!
//! Runs a crawl as one dispatcher task that owns a `JoinSet` of page tasks:
//!
//! - Up to K page tasks execute at once; each fetches one URL, interprets the
//!   page, submits the discovered links to the frontier and publishes at most
//!   one record.
//! - The dispatcher refills free slots from the frontier and otherwise waits
//!   for any task to complete. A task is reaped only after it has submitted
//!   all of its links, so "frontier empty and no task running" really means
//!   the crawl is exhausted.
//! - Records flow to the consumer over an unbounded channel. The stream ends
//!   when the dispatcher and every task have dropped their senders.

use crate::config::CrawlerConfig;
use crate::crawler::fetcher::{Fetch, FetchError};
use crate::crawler::frontier::Frontier;
use crate::crawler::pipeline::interpret_page;
use crate::record::Record;
use crate::schema::PageSchema;
use crate::url::query_params;
use crate::{ConfigError, CrawlerError};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;
use tokio::task::{JoinError, JoinHandle, JoinSet};

/// Behavior switches of a crawl run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrawlOptions {
    /// Submit publisher listing links in addition to detail links
    pub follow_listings: bool,
    /// Log progress every N published records; 0 disables
    pub progress_interval: u64,
}

impl Default for CrawlOptions {
    fn default() -> Self {
        Self {
            follow_listings: true,
            progress_interval: 100,
        }
    }
}

impl CrawlOptions {
    pub fn from_config(config: &CrawlerConfig) -> Self {
        Self {
            follow_listings: config.follow_listings,
            progress_interval: config.progress_interval,
        }
    }
}

/// Snapshot of a crawl's counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CrawlStats {
    /// Pages fetched successfully
    pub fetched: u64,
    /// Pages that answered 404
    pub not_found: u64,
    /// Transient fetch failures and panicked tasks
    pub failures: u64,
    /// Fetched pages classified as irrelevant
    pub irrelevant: u64,
    /// Records published
    pub records: u64,
    /// Page tasks currently executing
    pub in_flight: usize,
    /// URLs waiting in the frontier
    pub pending: usize,
}

#[derive(Debug, Default)]
struct CrawlCounters {
    fetched: AtomicU64,
    not_found: AtomicU64,
    failures: AtomicU64,
    irrelevant: AtomicU64,
    records: AtomicU64,
    in_flight: AtomicUsize,
}

impl CrawlCounters {
    fn snapshot(&self, frontier: &Frontier) -> CrawlStats {
        CrawlStats {
            fetched: self.fetched.load(Ordering::Relaxed),
            not_found: self.not_found.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
            irrelevant: self.irrelevant.load(Ordering::Relaxed),
            records: self.records.load(Ordering::Relaxed),
            in_flight: self.in_flight.load(Ordering::Relaxed),
            pending: frontier.pending_len(),
        }
    }
}

/// State shared by the dispatcher and every page task of one run
struct CrawlContext<F> {
    fetcher: Arc<F>,
    schema: Arc<PageSchema>,
    frontier: Arc<Frontier>,
    counters: Arc<CrawlCounters>,
    records: mpsc::UnboundedSender<Record>,
    options: CrawlOptions,
    started: Instant,
}

/// Schedules the page tasks of a crawl
pub struct Scheduler<F> {
    fetcher: Arc<F>,
    schema: Arc<PageSchema>,
    options: CrawlOptions,
}

impl<F: Fetch + 'static> Scheduler<F> {
    pub fn new(fetcher: F, schema: PageSchema, options: CrawlOptions) -> Self {
        Self {
            fetcher: Arc::new(fetcher),
            schema: Arc::new(schema),
            options,
        }
    }

    /// Starts a crawl from `seed` with at most `concurrency` page tasks
    ///
    /// Must be called from within a Tokio runtime. The crawl runs in the
    /// background; records are pulled from the returned stream.
    pub fn run(&self, seed: &str, concurrency: usize) -> Result<RecordStream, CrawlerError> {
        if concurrency == 0 {
            return Err(ConfigError::Validation("concurrency must be at least 1".to_string()).into());
        }

        let frontier = Arc::new(Frontier::new());
        let seed = frontier.enqueue_seed(seed)?;

        let counters = Arc::new(CrawlCounters::default());
        let (sender, receiver) = mpsc::unbounded_channel();

        let context = Arc::new(CrawlContext {
            fetcher: Arc::clone(&self.fetcher),
            schema: Arc::clone(&self.schema),
            frontier: Arc::clone(&frontier),
            counters: Arc::clone(&counters),
            records: sender,
            options: self.options,
            started: Instant::now(),
        });

        tracing::info!("Starting crawl from {} with {} concurrent tasks", seed, concurrency);
        let driver = tokio::spawn(dispatch(context, concurrency));

        Ok(RecordStream {
            receiver,
            counters,
            frontier,
            driver,
        })
    }
}

/// Records produced by a running crawl
pub struct RecordStream {
    receiver: mpsc::UnboundedReceiver<Record>,
    counters: Arc<CrawlCounters>,
    frontier: Arc<Frontier>,
    driver: JoinHandle<()>,
}

impl RecordStream {
    /// Waits for the next record; `None` once the crawl is exhausted
    pub async fn next(&mut self) -> Option<Record> {
        self.receiver.recv().await
    }

    /// Current counters of the crawl
    pub fn stats(&self) -> CrawlStats {
        self.counters.snapshot(&self.frontier)
    }

    /// Stops consuming and waits for the dispatcher to wind down
    ///
    /// If records are still being produced, no new page tasks are started;
    /// the ones already running are allowed to finish.
    pub async fn finish(self) -> CrawlStats {
        let Self {
            receiver,
            counters,
            frontier,
            driver,
        } = self;

        drop(receiver);
        if let Err(e) = driver.await {
            tracing::error!("Crawl dispatcher terminated abnormally: {}", e);
        }

        counters.snapshot(&frontier)
    }
}

async fn dispatch<F: Fetch + 'static>(context: Arc<CrawlContext<F>>, concurrency: usize) {
    let mut tasks = JoinSet::new();

    loop {
        if context.records.is_closed() {
            tracing::info!("Record consumer went away, no further pages will be scheduled");
            break;
        }

        while tasks.len() < concurrency {
            let Some(url) = context.frontier.dequeue() else {
                break;
            };

            context.counters.in_flight.fetch_add(1, Ordering::Relaxed);
            let task_context = Arc::clone(&context);
            tasks.spawn(async move { process_url(&task_context, &url).await });
        }

        // Empty set here implies an empty frontier: the fill loop above only
        // stops early when there is nothing left to dequeue.
        match tasks.join_next().await {
            Some(result) => reap(&context, result),
            None => break,
        }
    }

    while let Some(result) = tasks.join_next().await {
        reap(&context, result);
    }

    let stats = context.counters.snapshot(&context.frontier);
    tracing::info!(
        "Crawl finished in {:.1}s: {} pages fetched, {} records, {} not found, {} failures, {} irrelevant",
        context.started.elapsed().as_secs_f64(),
        stats.fetched,
        stats.records,
        stats.not_found,
        stats.failures,
        stats.irrelevant
    );
}

fn reap<F>(context: &CrawlContext<F>, result: Result<(), JoinError>) {
    context.counters.in_flight.fetch_sub(1, Ordering::Relaxed);

    if let Err(e) = result {
        context.counters.failures.fetch_add(1, Ordering::Relaxed);
        if e.is_panic() {
            tracing::warn!("Page task panicked: {}", e);
        } else {
            tracing::warn!("Page task did not complete: {}", e);
        }
    }
}

async fn process_url<F: Fetch>(context: &CrawlContext<F>, url: &str) {
    tracing::debug!("Fetching {}", url);

    let body = match context.fetcher.fetch(url).await {
        Ok(body) => body,
        Err(FetchError::NotFound) => {
            context.counters.not_found.fetch_add(1, Ordering::Relaxed);
            tracing::debug!("Not found: {}", url);
            return;
        }
        Err(FetchError::Transient(reason)) => {
            context.counters.failures.fetch_add(1, Ordering::Relaxed);
            tracing::warn!("Failed to fetch {}: {}", url, reason);
            return;
        }
    };

    context.counters.fetched.fetch_add(1, Ordering::Relaxed);

    let outcome = interpret_page(url, &body, &context.schema);
    drop(body);

    if !outcome.kind.is_relevant() {
        context.counters.irrelevant.fetch_add(1, Ordering::Relaxed);
        tracing::debug!("Irrelevant page: {}", url);
        return;
    }

    // The identifier is claimed before links are submitted so the page
    // cannot re-enqueue itself under its canonical URL.
    let record = outcome
        .record
        .filter(|record| context.frontier.mark_identifier_seen(&record.id));

    let submitted = submit_links(context, &outcome.links);
    tracing::debug!(
        "{:?} page {}: {} links, {} new",
        outcome.kind,
        url,
        outcome.links.len(),
        submitted
    );

    if let Some(record) = record {
        publish(context, record);
    }
}

/// Submits the links of a relevant page; returns how many were new
fn submit_links<F>(context: &CrawlContext<F>, links: &[String]) -> usize {
    let schema = &context.schema;
    let mut submitted = 0;

    for link in links {
        let target = if schema.is_detail_link(link) {
            let Some(id) = query_params(link)
                .remove(schema.item_id_param)
                .filter(|id| !id.is_empty())
            else {
                continue;
            };

            if context.frontier.is_identifier_seen(&id) {
                tracing::trace!("Skipping {}: item {} already seen", link, id);
                continue;
            }
            schema.detail_url(&id)
        } else if context.options.follow_listings {
            link.clone()
        } else {
            continue;
        };

        if context.frontier.try_enqueue(&target) {
            tracing::trace!("Enqueued {}", target);
            submitted += 1;
        }
    }

    submitted
}

fn publish<F>(context: &CrawlContext<F>, record: Record) {
    let id = record.id.clone();

    if context.records.send(record).is_err() {
        tracing::debug!("Record {} dropped, consumer went away", id);
        return;
    }

    let published = context.counters.records.fetch_add(1, Ordering::Relaxed) + 1;
    tracing::trace!("Published {}", id);

    let interval = context.options.progress_interval;
    if interval > 0 && published % interval == 0 {
        let elapsed = context.started.elapsed().as_secs_f64();
        tracing::info!(
            "Progress: {} records, {} pages fetched, {} pending, {:.2} records/sec",
            published,
            context.counters.fetched.load(Ordering::Relaxed),
            context.frontier.pending_len(),
            published as f64 / elapsed.max(f64::EPSILON)
        );
    }
}
