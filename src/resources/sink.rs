use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use bevy::prelude::*;
use csv::{Writer, WriterBuilder};

use crate::components::{CoefficientRow, Header};
use crate::resources::errors::{SinkError, SinkResult};

/// Destination for one output stream of a sweep.
pub trait DataSink {
    /// Start the stream by writing its header.
    fn begin(&mut self, header: &Header) -> SinkResult<()>;

    fn append(&mut self, row: &CoefficientRow) -> SinkResult<()>;

    /// Flush and close the stream.
    fn finish(&mut self) -> SinkResult<()>;
}

impl<T: DataSink + ?Sized> DataSink for Box<T> {
    fn begin(&mut self, header: &Header) -> SinkResult<()> {
        (**self).begin(header)
    }

    fn append(&mut self, row: &CoefficientRow) -> SinkResult<()> {
        (**self).append(row)
    }

    fn finish(&mut self) -> SinkResult<()> {
        (**self).finish()
    }
}

#[derive(Debug, Default)]
struct MemoryRecord {
    header: Option<Header>,
    rows: Vec<CoefficientRow>,
    finished: bool,
}

/// In-memory sink. Clones share the same record, so a clone kept by the caller
/// observes what the sweep wrote.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    record: Arc<Mutex<MemoryRecord>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, MemoryRecord> {
        self.record.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn header(&self) -> Option<Header> {
        self.lock().header.clone()
    }

    pub fn rows(&self) -> Vec<CoefficientRow> {
        self.lock().rows.clone()
    }

    pub fn is_finished(&self) -> bool {
        self.lock().finished
    }
}

impl DataSink for MemorySink {
    fn begin(&mut self, header: &Header) -> SinkResult<()> {
        let mut record = self.lock();
        record.header = Some(header.clone());
        record.rows.clear();
        record.finished = false;
        Ok(())
    }

    fn append(&mut self, row: &CoefficientRow) -> SinkResult<()> {
        let mut record = self.lock();
        let expected = record.header.as_ref().ok_or(SinkError::NotStarted)?.width();
        if row.width() != expected {
            return Err(SinkError::ColumnMismatch {
                expected,
                found: row.width(),
            });
        }
        record.rows.push(row.clone());
        Ok(())
    }

    fn finish(&mut self) -> SinkResult<()> {
        self.lock().finished = true;
        Ok(())
    }
}

/// Writes the header and rows to a delimited text file. The file is only created
/// once the stream begins.
pub struct DelimitedFileSink {
    path: PathBuf,
    delimiter: u8,
    writer: Option<Writer<File>>,
    width: usize,
}

impl DelimitedFileSink {
    /// Tab-delimited sink
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self::with_delimiter(path, b'\t')
    }

    pub fn with_delimiter(path: impl AsRef<Path>, delimiter: u8) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            delimiter,
            writer: None,
            width: 0,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DataSink for DelimitedFileSink {
    fn begin(&mut self, header: &Header) -> SinkResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let mut writer = WriterBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(false)
            .from_path(&self.path)?;
        writer.write_record(header.labels())?;

        info!("Writing sweep data to {}", self.path.display());
        self.width = header.width();
        self.writer = Some(writer);
        Ok(())
    }

    fn append(&mut self, row: &CoefficientRow) -> SinkResult<()> {
        let writer = self.writer.as_mut().ok_or(SinkError::NotStarted)?;
        if row.width() != self.width {
            return Err(SinkError::ColumnMismatch {
                expected: self.width,
                found: row.width(),
            });
        }
        writer.write_record(row.fields())?;
        Ok(())
    }

    fn finish(&mut self) -> SinkResult<()> {
        if let Some(mut writer) = self.writer.take() {
            writer.flush()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{CoefficientKind, Column, SecondaryVariable};
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn header() -> Header {
        Header {
            primary: "alpha".to_string(),
            columns: vec![Column {
                kind: CoefficientKind::Lift,
                variable: SecondaryVariable::Flap,
                value: 0.0,
            }],
        }
    }

    #[test]
    fn test_memory_sink_shares_record() {
        let observer = MemorySink::new();
        let mut sink = observer.clone();

        sink.begin(&header()).unwrap();
        sink.append(&CoefficientRow {
            primary: 0.0,
            values: vec![0.25],
        })
        .unwrap();
        sink.finish().unwrap();

        assert_eq!(observer.rows().len(), 1);
        assert!(observer.is_finished());
    }

    #[test]
    fn test_append_before_begin_fails() {
        let mut sink = MemorySink::new();
        let result = sink.append(&CoefficientRow::new(0.0));
        assert!(matches!(result, Err(SinkError::NotStarted)));
    }

    #[test]
    fn test_width_mismatch_rejected() {
        let mut sink = MemorySink::new();
        sink.begin(&header()).unwrap();
        let result = sink.append(&CoefficientRow::new(0.0));
        assert!(matches!(
            result,
            Err(SinkError::ColumnMismatch {
                expected: 2,
                found: 1
            })
        ));
    }

    #[test]
    fn test_file_sink_writes_tab_delimited() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data alpha.txt");
        let mut sink = DelimitedFileSink::new(&path);
        assert!(!path.exists());

        sink.begin(&header()).unwrap();
        sink.append(&CoefficientRow {
            primary: 2.5,
            values: vec![0.4],
        })
        .unwrap();
        sink.finish().unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "alpha\tCL for flap at 0.00\n2.50\t0.4000\n");
    }
}
