//! Output sink trait and error type

use crate::record::Record;
use thiserror::Error;

/// Errors that can occur while writing records
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to serialize record: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Destination of the records published by a crawl
///
/// Records arrive one at a time in publication order. A sink must make each
/// record durable before returning, so an interrupted crawl loses nothing
/// that was already written.
pub trait RecordSink {
    /// Writes one record
    fn write_record(&mut self, record: &Record) -> OutputResult<()>;

    /// Flushes any buffered state once the crawl is over
    fn finish(&mut self) -> OutputResult<()> {
        Ok(())
    }
}

impl RecordSink for Vec<Record> {
    fn write_record(&mut self, record: &Record) -> OutputResult<()> {
        self.push(record.clone());
        Ok(())
    }
}
