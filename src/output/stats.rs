//! End-of-run crawl report
//!
//! Pairs the final counters of a crawl with its wall-clock window and prints
//! them as a short summary once the crawl is over.

use crate::crawler::CrawlStats;
use chrono::{DateTime, Utc};

/// Final statistics of one crawl run
#[derive(Debug, Clone)]
pub struct CrawlReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub stats: CrawlStats,
}

impl CrawlReport {
    pub fn new(started_at: DateTime<Utc>, finished_at: DateTime<Utc>, stats: CrawlStats) -> Self {
        Self {
            started_at,
            finished_at,
            stats,
        }
    }

    /// Wall-clock duration in seconds
    pub fn duration_seconds(&self) -> i64 {
        (self.finished_at - self.started_at).num_seconds()
    }

    /// Share of fetched pages that produced a record, as a percentage
    pub fn yield_rate(&self) -> f64 {
        if self.stats.fetched == 0 {
            return 0.0;
        }
        (self.stats.records as f64 / self.stats.fetched as f64) * 100.0
    }
}

/// Prints the report to stderr
///
/// Stderr keeps stdout free for record output.
pub fn print_report(report: &CrawlReport) {
    let stats = &report.stats;

    eprintln!("=== Crawl Report ===\n");
    eprintln!("Started:  {}", report.started_at.to_rfc3339());
    eprintln!("Finished: {}", report.finished_at.to_rfc3339());
    eprintln!("Duration: {}s", report.duration_seconds());
    eprintln!();

    eprintln!("Pages:");
    eprintln!("  Fetched: {}", stats.fetched);
    eprintln!("  Not found: {}", stats.not_found);
    eprintln!("  Failed: {}", stats.failures);
    eprintln!("  Irrelevant: {}", stats.irrelevant);
    if stats.pending > 0 {
        eprintln!("  Left unvisited: {}", stats.pending);
    }
    eprintln!();

    eprintln!(
        "Records: {} ({:.1}% of fetched pages)",
        stats.records,
        report.yield_rate()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_duration_and_yield() {
        let started_at = Utc::now();
        let report = CrawlReport::new(
            started_at,
            started_at + Duration::seconds(90),
            CrawlStats {
                fetched: 200,
                records: 50,
                ..CrawlStats::default()
            },
        );

        assert_eq!(report.duration_seconds(), 90);
        assert!((report.yield_rate() - 25.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_yield_of_empty_crawl() {
        let now = Utc::now();
        let report = CrawlReport::new(now, now, CrawlStats::default());
        assert_eq!(report.yield_rate(), 0.0);
    }
}
