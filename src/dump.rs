//! Capture Converter
//!
//! Turns capture files into newline-delimited JSON, one object per trace.
//! Completed traces carry `src`, `dst` and their hops; incomplete traces are
//! still emitted, with only the `ark` field, so attempts remain countable.

use crate::agent::normalize_agent_name;
use crate::capture::{CaptureRecord, CaptureSource, TraceRecord};
use crate::config::DumpConfig;
use crate::error::TracerError;
use flate2::write::GzEncoder;
use flate2::Compression;
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// One hop in the dump output
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DumpHop {
    pub addr: String,
    pub name: Option<String>,
    pub rtt_ms: f64,
}

/// One line of the dump output
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DumpLine {
    pub ark: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dst: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hops: Option<Vec<DumpHop>>,
}

impl From<&TraceRecord> for DumpLine {
    fn from(trace: &TraceRecord) -> Self {
        let ark = normalize_agent_name(&trace.monitor);
        if !trace.is_stop_completed() {
            return DumpLine {
                ark,
                src: None,
                dst: None,
                hops: None,
            };
        }
        let hops = (0..trace.hop_count())
            .filter_map(|i| trace.hop(i))
            .map(|hop| DumpHop {
                addr: hop.addr.to_string(),
                name: hop.name.clone(),
                rtt_ms: hop.rtt_ms(),
            })
            .collect();
        DumpLine {
            ark,
            src: Some(trace.src.to_string()),
            dst: Some(trace.dst.to_string()),
            hops: Some(hops),
        }
    }
}

/// Counters for one conversion
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DumpStats {
    pub files: usize,
    pub skipped_files: usize,
    pub records: usize,
    pub completed: usize,
    pub incomplete: usize,
}

/// Converts capture files read through a `CaptureSource`.
pub struct CaptureConverter<S: CaptureSource> {
    source: S,
    extension: String,
}

impl<S: CaptureSource> CaptureConverter<S> {
    pub fn new(source: S, extension: impl Into<String>) -> Self {
        Self {
            source,
            extension: extension.into(),
        }
    }

    fn accepts(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| e == self.extension)
            .unwrap_or(false)
    }

    /// Convert every accepted file in order, writing JSON lines to `out`.
    pub fn convert<W: Write>(&self, paths: &[PathBuf], out: &mut W) -> Result<DumpStats, TracerError> {
        let mut stats = DumpStats::default();
        for path in paths {
            if !self.accepts(path) {
                debug!(path = %path.display(), "Skipping file with foreign extension");
                stats.skipped_files += 1;
                continue;
            }
            info!(path = %path.display(), "Converting capture file");
            stats.files += 1;
            for record in self.source.open(path)? {
                let CaptureRecord::Trace(trace) = record? else {
                    continue;
                };
                let line = DumpLine::from(&trace);
                stats.records += 1;
                if line.hops.is_some() {
                    stats.completed += 1;
                } else {
                    stats.incomplete += 1;
                }
                serde_json::to_writer(&mut *out, &line)?;
                out.write_all(b"\n")?;
            }
        }
        Ok(stats)
    }
}

/// Convert `files` into the gzip-compressed output named in `config`.
///
/// The archive is written next to the output and renamed into place only
/// once every file converted, so a failed run leaves no truncated output.
pub fn run_dump<S: CaptureSource>(
    source: S,
    config: &DumpConfig,
    files: &[PathBuf],
) -> Result<DumpStats, TracerError> {
    let converter = CaptureConverter::new(source, config.capture_extension.clone());
    if let Some(parent) = config.output.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let partial = partial_path(&config.output);
    let stats = match write_archive(&converter, files, &partial) {
        Ok(stats) => stats,
        Err(e) => {
            if let Err(cleanup) = std::fs::remove_file(&partial) {
                debug!(path = %partial.display(), error = %cleanup, "Failed to remove partial dump");
            }
            return Err(e);
        }
    };
    std::fs::rename(&partial, &config.output)?;
    info!(
        output = %config.output.display(),
        files = stats.files,
        records = stats.records,
        "Dump complete"
    );
    Ok(stats)
}

fn partial_path(output: &Path) -> PathBuf {
    let mut name = output.as_os_str().to_owned();
    name.push(".partial");
    PathBuf::from(name)
}

fn write_archive<S: CaptureSource>(
    converter: &CaptureConverter<S>,
    files: &[PathBuf],
    path: &Path,
) -> Result<DumpStats, TracerError> {
    let file = std::fs::File::create(path)?;
    let mut encoder = GzEncoder::new(std::io::BufWriter::new(file), Compression::default());
    let stats = converter.convert(files, &mut encoder)?;
    encoder.finish()?.flush()?;
    Ok(stats)
}
