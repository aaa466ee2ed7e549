//! JSON-lines capture files: one `CaptureRecord` per line.

use super::record::CaptureRecord;
use super::{CaptureSource, CaptureWriter, RecordIter, SinkFactory};
use crate::error::TracerError;
use crate::types::AgentId;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Reads JSON-lines capture files.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonLinesCaptureSource;

impl CaptureSource for JsonLinesCaptureSource {
    fn open(&self, path: &Path) -> Result<RecordIter, TracerError> {
        let file = File::open(path)?;
        let path = path.to_path_buf();
        let iter = BufReader::new(file)
            .lines()
            .enumerate()
            .filter_map(move |(idx, line)| match line {
                Ok(line) if line.trim().is_empty() => None,
                Ok(line) => Some(serde_json::from_str::<CaptureRecord>(&line).map_err(|e| {
                    TracerError::MalformedRecord {
                        path: path.clone(),
                        line: idx + 1,
                        reason: e.to_string(),
                    }
                })),
                Err(e) => Some(Err(TracerError::Io(e))),
            });
        Ok(Box::new(iter))
    }
}

/// Appends records to any writer as JSON lines.
pub struct JsonLinesCaptureWriter<W: Write> {
    inner: W,
}

impl<W: Write> JsonLinesCaptureWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }
}

impl<W: Write + Send> CaptureWriter for JsonLinesCaptureWriter<W> {
    fn write_record(&mut self, record: &CaptureRecord) -> Result<(), TracerError> {
        serde_json::to_writer(&mut self.inner, record)?;
        self.inner.write_all(b"\n")?;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), TracerError> {
        self.inner.flush()?;
        Ok(())
    }
}

/// Creates one capture file per agent: `{dir}/{agent}.{timestamp}.bulktracer.{ext}`.
#[derive(Debug, Clone)]
pub struct CaptureFileFactory {
    dir: PathBuf,
    timestamp: String,
    extension: String,
}

impl CaptureFileFactory {
    pub fn new(dir: PathBuf, timestamp: String, extension: String) -> Self {
        Self {
            dir,
            timestamp,
            extension,
        }
    }

    /// Path the capture file for `agent` is written to.
    pub fn path_for(&self, agent: &str) -> PathBuf {
        self.dir.join(format!(
            "{}.{}.bulktracer.{}",
            agent, self.timestamp, self.extension
        ))
    }
}

impl SinkFactory for CaptureFileFactory {
    fn create(&self, agent: &AgentId) -> Result<Box<dyn CaptureWriter>, TracerError> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.path_for(agent);
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)?;
        Ok(Box::new(JsonLinesCaptureWriter::new(BufWriter::new(file))))
    }
}
