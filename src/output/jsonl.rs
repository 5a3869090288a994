//! JSON-lines record writer

use crate::output::traits::{OutputResult, RecordSink};
use crate::record::Record;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Writes one JSON object per line, flushing after every record
pub struct JsonLinesWriter<W: Write> {
    writer: W,
    written: u64,
}

impl JsonLinesWriter<BufWriter<File>> {
    /// Creates (or truncates) the destination file
    pub fn create(path: &Path) -> OutputResult<Self> {
        let file = File::create(path)?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> JsonLinesWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, written: 0 }
    }

    /// Number of records written so far
    pub fn written(&self) -> u64 {
        self.written
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> RecordSink for JsonLinesWriter<W> {
    fn write_record(&mut self, record: &Record) -> OutputResult<()> {
        serde_json::to_writer(&mut self.writer, record)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        self.written += 1;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Price;
    use serde_json::Value;
    use tempfile::TempDir;

    fn record(id: &str) -> Record {
        Record::new(id, format!("https://x/details?id={}", id))
    }

    #[test]
    fn test_one_object_per_line() {
        let mut writer = JsonLinesWriter::new(Vec::new());
        writer.write_record(&record("com.a")).unwrap();

        let mut paid = record("com.b");
        paid.set_price(Price::Paid("0.99".to_string()));
        writer.write_record(&paid).unwrap();
        assert_eq!(writer.written(), 2);

        let output = String::from_utf8(writer.into_inner()).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 2);

        let first: Value = serde_json::from_str(lines[0]).unwrap();
        let second: Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(first["uid"], "com.a");
        assert_eq!(first["price"], 0);
        assert_eq!(second["uid"], "com.b");
        assert_eq!(second["price"], "0.99");
    }

    #[test]
    fn test_file_is_readable_before_finish() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("apps.jsonl");

        let mut writer = JsonLinesWriter::create(&path).unwrap();
        writer.write_record(&record("com.a")).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 1);
        assert!(content.ends_with('\n'));

        writer.finish().unwrap();
    }

    #[test]
    fn test_create_in_missing_directory_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("apps.jsonl");
        assert!(JsonLinesWriter::create(&path).is_err());
    }
}
