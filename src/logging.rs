//! Logging System
//!
//! Structured logging through `tracing`. Level, format (text or json) and
//! destination are configurable from the `[logging]` config section, CLI
//! flags, and `BULKTRACER_LOG*` environment variables.

use crate::error::TracerError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::fmt::writer::{BoxMakeWriter, MakeWriterExt};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

/// Resolve the log file path with precedence: CLI, BULKTRACER_LOG_FILE env, config file, default.
pub fn resolve_log_file_path(
    cli_file: Option<PathBuf>,
    config_file: Option<PathBuf>,
) -> Result<PathBuf, TracerError> {
    if let Some(p) = cli_file {
        if !p.as_os_str().is_empty() {
            return Ok(p);
        }
    }
    if let Ok(env_path) = std::env::var("BULKTRACER_LOG_FILE") {
        if !env_path.is_empty() {
            return Ok(PathBuf::from(env_path));
        }
    }
    if let Some(p) = config_file {
        if !p.as_os_str().is_empty() {
            return Ok(p);
        }
    }
    default_log_file_path()
}

fn default_log_file_path() -> Result<PathBuf, TracerError> {
    let project_dirs = directories::ProjectDirs::from("", "", "bulktracer").ok_or_else(|| {
        TracerError::Logging("Could not determine platform state directory for log file".to_string())
    })?;
    let dir = project_dirs
        .state_dir()
        .unwrap_or_else(|| project_dirs.data_local_dir())
        .to_path_buf();
    Ok(dir.join("bulktracer.log"))
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Whether logging is enabled (default: true)
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Log level: trace, debug, info, warn, error, off
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format: json, text (default: text)
    #[serde(default = "default_format")]
    pub format: String,

    /// Output destination: stdout, stderr, file, file+stderr, both
    #[serde(default = "default_output")]
    pub output: String,

    /// Log file path when output includes file; None means use runtime default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,

    /// Enable colored output (text format only, stdout/stderr only)
    #[serde(default = "default_true")]
    pub color: bool,

    /// Module-specific log levels
    #[serde(default)]
    pub modules: HashMap<String, String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_format() -> String {
    "text".to_string()
}

fn default_output() -> String {
    "stderr".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            level: default_log_level(),
            format: default_format(),
            output: default_output(),
            file: None,
            color: default_true(),
            modules: HashMap::new(),
        }
    }
}

/// Rendering of each event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = TracerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(TracerError::Logging(format!(
                "Invalid log format: {} (must be 'json' or 'text')",
                other
            ))),
        }
    }
}

/// Where events are written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Destinations {
    stdout: bool,
    stderr: bool,
    file: bool,
}

impl FromStr for Destinations {
    type Err = TracerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (stdout, stderr, file) = match s {
            "stdout" => (true, false, false),
            "stderr" => (false, true, false),
            "file" => (false, false, true),
            "file+stderr" => (false, true, true),
            "both" => (true, true, false),
            other => {
                return Err(TracerError::Logging(format!(
                    "Invalid log output: {} (must be 'stdout', 'stderr', 'file', 'file+stderr', or 'both')",
                    other
                )))
            }
        };
        Ok(Destinations {
            stdout,
            stderr,
            file,
        })
    }
}

impl Destinations {
    fn writer(
        &self,
        config: Option<&LoggingConfig>,
        cli_file: Option<&Path>,
    ) -> Result<BoxMakeWriter, TracerError> {
        if self.file {
            let path = resolve_log_file_path(
                cli_file.map(Path::to_path_buf),
                config.and_then(|c| c.file.clone()),
            )?;
            let file = open_log_file(&path)?;
            return Ok(if self.stderr {
                BoxMakeWriter::new(file.and(std::io::stderr))
            } else {
                BoxMakeWriter::new(file)
            });
        }
        Ok(match (self.stdout, self.stderr) {
            (true, true) => BoxMakeWriter::new(std::io::stdout.and(std::io::stderr)),
            (true, false) => BoxMakeWriter::new(std::io::stdout),
            _ => BoxMakeWriter::new(std::io::stderr),
        })
    }
}

/// Install the global subscriber.
///
/// `BULKTRACER_LOG`, `BULKTRACER_LOG_FORMAT` and `BULKTRACER_LOG_OUTPUT` take
/// precedence over `config`, which already carries the other CLI flags.
/// `cli_file` is the `--log-file` flag. A second call leaves the first
/// subscriber in place.
pub fn init_logging(
    config: Option<&LoggingConfig>,
    cli_file: Option<&Path>,
) -> Result<(), TracerError> {
    if config.is_some_and(|c| !c.enabled) {
        let _ = Registry::default().with(EnvFilter::new("off")).try_init();
        return Ok(());
    }

    let filter = build_env_filter(config)?;
    let format = env_or_config("BULKTRACER_LOG_FORMAT", config.map(|c| c.format.as_str()), "text")
        .parse::<LogFormat>()?;
    let destinations =
        env_or_config("BULKTRACER_LOG_OUTPUT", config.map(|c| c.output.as_str()), "stderr")
            .parse::<Destinations>()?;
    let ansi = config.map_or(true, |c| c.color) && !destinations.file;
    let writer = destinations.writer(config, cli_file)?;

    let layer = fmt::layer()
        .with_target(true)
        .with_timer(ChronoUtc::rfc_3339())
        .with_writer(writer);
    let registry = Registry::default().with(filter);
    let installed = match format {
        LogFormat::Json => registry.with(layer.json()).try_init(),
        LogFormat::Text => registry.with(layer.with_ansi(ansi)).try_init(),
    };
    if let Err(e) = installed {
        tracing::debug!("Logging already initialized: {}", e);
    }
    Ok(())
}

fn env_or_config(var: &str, configured: Option<&str>, fallback: &str) -> String {
    match std::env::var(var) {
        Ok(value) if !value.is_empty() => value,
        _ => configured.unwrap_or(fallback).to_string(),
    }
}

fn open_log_file(path: &Path) -> Result<std::fs::File, TracerError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| TracerError::Logging(format!("Failed to create log directory: {}", e)))?;
    }
    std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| TracerError::Logging(format!("Failed to open log file {:?}: {}", path, e)))
}

/// `BULKTRACER_LOG` directives, else the configured level plus per-module levels.
fn build_env_filter(config: Option<&LoggingConfig>) -> Result<EnvFilter, TracerError> {
    if let Ok(filter) = EnvFilter::try_from_env("BULKTRACER_LOG") {
        return Ok(filter);
    }
    let Some(config) = config else {
        return Ok(EnvFilter::new("info"));
    };
    if config.level == "off" {
        return Ok(EnvFilter::new("off"));
    }
    config
        .modules
        .iter()
        .try_fold(EnvFilter::new(&config.level), |filter, (module, level)| {
            let directive = format!("{}={}", module, level)
                .parse::<Directive>()
                .map_err(|e| TracerError::Logging(format!("Invalid log directive: {}", e)))?;
            Ok(filter.add_directive(directive))
        })
}
