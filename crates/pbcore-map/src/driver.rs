//! Batch driver: per-record isolation and output sinks.

use std::fs;
use std::io;
use std::path::PathBuf;

use pbcore_model::Record;
use serde::Serialize;
use tracing::{error, info};

use crate::error::MapError;

/// Destination for finalized documents.
pub trait OutputSink {
    fn write(&mut self, name: &str, bytes: &[u8]) -> io::Result<()>;
}

/// Writes each document as a file under one directory.
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    /// Creates the directory if needed.
    pub fn create(dir: impl Into<PathBuf>) -> io::Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &PathBuf {
        &self.dir
    }
}

impl OutputSink for DirectorySink {
    fn write(&mut self, name: &str, bytes: &[u8]) -> io::Result<()> {
        fs::write(self.dir.join(name), bytes)
    }
}

/// Collects documents in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    pub documents: Vec<(String, Vec<u8>)>,
}

impl OutputSink for MemorySink {
    fn write(&mut self, name: &str, bytes: &[u8]) -> io::Result<()> {
        self.documents.push((name.to_string(), bytes.to_vec()));
        Ok(())
    }
}

/// Outcome of one record.
#[derive(Debug, Clone, Serialize)]
pub struct RecordReport {
    /// 1-based position of the record in the batch.
    pub ordinal: usize,
    /// Output name when the record was written.
    pub output: Option<String>,
    /// Error text when the record was skipped.
    pub error: Option<String>,
}

/// Outcome of a whole batch.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchSummary {
    pub written: usize,
    pub failed: usize,
    pub reports: Vec<RecordReport>,
}

impl BatchSummary {
    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }
}

/// Runs `build` for every record, writing successes to `sink`.
///
/// This is the only recovery boundary: a mapping failure is logged with
/// the record's ordinal, reported, and skipped, so one bad record never
/// aborts the batch. Sink I/O failure does abort; there is nowhere left
/// to write.
pub fn run_batch<F>(
    records: &[Record],
    mut build: F,
    sink: &mut dyn OutputSink,
) -> io::Result<BatchSummary>
where
    F: FnMut(&Record) -> Result<(String, Vec<u8>), MapError>,
{
    let mut summary = BatchSummary::default();
    for (index, record) in records.iter().enumerate() {
        let ordinal = index + 1;
        match build(record) {
            Ok((name, bytes)) => {
                sink.write(&name, &bytes)?;
                info!(ordinal, output = %name, "wrote document");
                summary.written += 1;
                summary.reports.push(RecordReport {
                    ordinal,
                    output: Some(name),
                    error: None,
                });
            }
            Err(cause) => {
                error!(ordinal, %cause, "record skipped");
                summary.failed += 1;
                summary.reports.push(RecordReport {
                    ordinal,
                    output: None,
                    error: Some(cause.to_string()),
                });
            }
        }
    }
    info!(
        written = summary.written,
        failed = summary.failed,
        "batch finished"
    );
    Ok(summary)
}
