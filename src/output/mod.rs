//! Output module for crawl records and reports
//!
//! This module handles:
//! - The `RecordSink` interface records are written through
//! - JSON-lines output, one record per line
//! - The end-of-run crawl report

mod jsonl;
pub mod stats;
mod traits;

pub use jsonl::JsonLinesWriter;
pub use stats::{print_report, CrawlReport};
pub use traits::{OutputError, OutputResult, RecordSink};
