//! Backing stores for historical records.

use std::cell::RefCell;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::rc::Rc;

use tracing::debug;

use super::{HistoricalRecord, ServiceType};
use crate::error::SinkError;

/// Append-only destination for historical records.
pub trait RecordSink {
    /// Appends one record.
    fn append(&self, record: &HistoricalRecord) -> Result<(), SinkError>;
}

/// Appends records as CSV lines, `timestamp,field,...`, to one file.
///
/// The file is opened in append mode per record, so existing content from
/// earlier runs is preserved.
#[derive(Debug, Clone)]
pub struct CsvFileSink {
    path: PathBuf,
}

impl CsvFileSink {
    /// Sink writing to `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Sink writing to the category's standard file inside `output_dir`.
    pub fn for_category(output_dir: &Path, category: ServiceType) -> Self {
        Self::new(output_dir.join(category.file_name()))
    }

    /// Target path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RecordSink for CsvFileSink {
    fn append(&self, record: &HistoricalRecord) -> Result<(), SinkError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_writer(file);

        writer.write_record(
            std::iter::once(record.timestamp.as_str())
                .chain(record.fields.iter().map(String::as_str)),
        )?;
        writer.flush()?;

        debug!(path = %self.path.display(), key = %record.persist_key, "Record appended");
        Ok(())
    }
}

/// In-memory sink shared between clones; used by tests and dry runs.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    records: Rc<RefCell<Vec<HistoricalRecord>>>,
}

impl MemorySink {
    /// Empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything appended so far, in append order.
    pub fn records(&self) -> Vec<HistoricalRecord> {
        self.records.borrow().clone()
    }

    /// Records of one category, in append order.
    pub fn category(&self, category: ServiceType) -> Vec<HistoricalRecord> {
        self.records
            .borrow()
            .iter()
            .filter(|r| r.category == category)
            .cloned()
            .collect()
    }

    /// Number of records of one category.
    pub fn count(&self, category: ServiceType) -> usize {
        self.records
            .borrow()
            .iter()
            .filter(|r| r.category == category)
            .count()
    }

    /// Total records appended.
    pub fn len(&self) -> usize {
        self.records.borrow().len()
    }

    /// True when nothing has been appended.
    pub fn is_empty(&self) -> bool {
        self.records.borrow().is_empty()
    }
}

impl RecordSink for MemorySink {
    fn append(&self, record: &HistoricalRecord) -> Result<(), SinkError> {
        self.records.borrow_mut().push(record.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(category: ServiceType, key: &str) -> HistoricalRecord {
        HistoricalRecord {
            category,
            persist_key: key.to_string(),
            timestamp: "2024-01-02 03:04:05.006".to_string(),
            fields: vec![key.to_string(), "99-16+".to_string(), "1000000".to_string()],
        }
    }

    #[test]
    fn test_csv_sink_appends() {
        let dir = tempfile::tempdir().unwrap();
        let sink = CsvFileSink::for_category(dir.path(), ServiceType::Position);
        assert!(sink.path().ends_with("positions.txt"));

        sink.append(&record(ServiceType::Position, "9128283H1")).unwrap();
        sink.append(&record(ServiceType::Position, "912810RZ3")).unwrap();

        let content = fs::read_to_string(sink.path()).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(
            lines,
            vec![
                "2024-01-02 03:04:05.006,9128283H1,99-16+,1000000",
                "2024-01-02 03:04:05.006,912810RZ3,99-16+,1000000",
            ]
        );
    }

    #[test]
    fn test_csv_sink_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let sink = CsvFileSink::new(dir.path().join("nested").join("risk.txt"));
        sink.append(&record(ServiceType::Risk, "9128283H1")).unwrap();
        assert!(sink.path().exists());
    }

    #[test]
    fn test_csv_sink_unwritable_path() {
        let dir = tempfile::tempdir().unwrap();
        // A directory cannot be opened for appending
        let sink = CsvFileSink::new(dir.path());
        assert!(matches!(
            sink.append(&record(ServiceType::Risk, "x")),
            Err(SinkError::Io(_))
        ));
    }

    #[test]
    fn test_memory_sink_is_shared_between_clones() {
        let sink = MemorySink::new();
        let clone = sink.clone();
        clone.append(&record(ServiceType::Risk, "a")).unwrap();
        clone.append(&record(ServiceType::Inquiry, "b")).unwrap();

        assert_eq!(sink.len(), 2);
        assert_eq!(sink.count(ServiceType::Risk), 1);
        assert_eq!(sink.category(ServiceType::Inquiry)[0].persist_key, "b");
        assert_eq!(sink.count(ServiceType::Streaming), 0);
    }
}
