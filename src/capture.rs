//! Capture files
//!
//! Measurement results are persisted as capture files: one per agent during a
//! probing run, consumed again by the converter. The reader and writer sit
//! behind traits so the on-disk format can be swapped without touching the
//! prober or converter.

pub mod jsonl;
pub mod record;

use crate::error::TracerError;
use crate::types::AgentId;
use std::path::Path;

pub use jsonl::{CaptureFileFactory, JsonLinesCaptureSource, JsonLinesCaptureWriter};
pub use record::{CaptureRecord, DealiasRecord, StopReason, TraceHop, TraceRecord};

/// Lazy, single-pass sequence of records from one capture file.
pub type RecordIter = Box<dyn Iterator<Item = Result<CaptureRecord, TracerError>>>;

/// Opens capture files for reading.
pub trait CaptureSource {
    fn open(&self, path: &Path) -> Result<RecordIter, TracerError>;
}

/// Agent-exclusive append destination for results.
pub trait CaptureWriter: Send {
    fn write_record(&mut self, record: &CaptureRecord) -> Result<(), TracerError>;
    fn flush(&mut self) -> Result<(), TracerError>;
}

/// Opens one capture writer per agent.
pub trait SinkFactory {
    fn create(&self, agent: &AgentId) -> Result<Box<dyn CaptureWriter>, TracerError>;
}
