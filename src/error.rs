//! Error types for bulktracer.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the library.
///
/// Structural problems (no targets, no usable step, missing flags) abort a run.
/// Transient ones (a single poll failure, a bad target line) are absorbed by the
/// caller and never surface as a `TracerError`.
#[derive(Debug, Error)]
pub enum TracerError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Target list is empty")]
    EmptyTargets,

    #[error("No coprime step candidates for a target list of length {n}")]
    NoStepCandidates { n: usize },

    #[error("Missing required argument: {0}")]
    MissingArgument(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Measurement control error: {0}")]
    Control(String),

    #[error("Malformed capture record in {path:?} at line {line}: {reason}")]
    MalformedRecord {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    #[error("Logging error: {0}")]
    Logging(String),
}

impl From<config::ConfigError> for TracerError {
    fn from(err: config::ConfigError) -> Self {
        TracerError::ConfigError(err.to_string())
    }
}
