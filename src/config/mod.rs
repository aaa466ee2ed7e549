//! Configuration
//!
//! Layered configuration: built-in defaults, the global config file, an
//! explicit `--config` file, then `BULKTRACER__*` environment variables.

pub mod facade;
pub mod merge;
pub mod sources;

use crate::control::{TraceMethod, TraceOptions};
use crate::error::TracerError;
use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

pub use facade::ConfigLoader;

fn default_mux_path() -> PathBuf {
    PathBuf::from("/run/ark-special/mux")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("output")
}

fn default_capture_extension() -> String {
    "jsonl".to_string()
}

fn default_wait_timeout_ms() -> u64 {
    2000
}

fn default_idle_timeout_secs() -> u64 {
    15 * 60
}

fn default_excluded_agents() -> Vec<String> {
    vec!["sjj-ba".to_string()]
}

fn default_dump_output() -> PathBuf {
    PathBuf::from("random.json.gz")
}

/// Settings for `--mode probe`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbeConfig {
    /// Socket of the local agent multiplexer bridge
    #[serde(default = "default_mux_path")]
    pub mux_path: PathBuf,

    /// Directory receiving one capture file per agent
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Extension of the capture files written
    #[serde(default = "default_capture_extension")]
    pub capture_extension: String,

    /// Traceroute probing method
    #[serde(default)]
    pub method: TraceMethod,

    /// Per-probe reply timeout (milliseconds)
    #[serde(default = "default_wait_timeout_ms")]
    pub wait_timeout_ms: u64,

    /// Optional gap between probes (milliseconds)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wait_probe_ms: Option<u64>,

    /// Resolve reverse DNS names for hops
    #[serde(default)]
    pub ptr: bool,

    /// Give up when nothing is received for this long (seconds)
    #[serde(default = "default_idle_timeout_secs")]
    pub idle_timeout_secs: u64,

    /// Normalized agent names that never receive work
    #[serde(default = "default_excluded_agents")]
    pub excluded_agents: Vec<String>,

    /// Fixed RNG seed for reproducible visiting orders
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            mux_path: default_mux_path(),
            output_dir: default_output_dir(),
            capture_extension: default_capture_extension(),
            method: TraceMethod::default(),
            wait_timeout_ms: default_wait_timeout_ms(),
            wait_probe_ms: None,
            ptr: false,
            idle_timeout_secs: default_idle_timeout_secs(),
            excluded_agents: default_excluded_agents(),
            seed: None,
        }
    }
}

impl ProbeConfig {
    pub fn trace_options(&self) -> TraceOptions {
        TraceOptions {
            method: self.method,
            wait_timeout: Duration::from_millis(self.wait_timeout_ms),
            wait_probe: self.wait_probe_ms.map(Duration::from_millis),
            ptr: self.ptr,
        }
    }

    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }
}

/// Settings for `--mode dump`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DumpConfig {
    /// Gzip-compressed JSON-lines output file
    #[serde(default = "default_dump_output")]
    pub output: PathBuf,

    /// Only input files with this extension are converted
    #[serde(default = "default_capture_extension")]
    pub capture_extension: String,
}

impl Default for DumpConfig {
    fn default() -> Self {
        Self {
            output: default_dump_output(),
            capture_extension: default_capture_extension(),
        }
    }
}

/// Root configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TracerConfig {
    #[serde(default)]
    pub probe: ProbeConfig,

    #[serde(default)]
    pub dump: DumpConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl TracerConfig {
    /// Reject settings no run could work with.
    pub fn validate(&self) -> Result<(), TracerError> {
        if self.probe.idle_timeout_secs == 0 {
            return Err(TracerError::ConfigError(
                "probe.idle_timeout_secs must be greater than zero".to_string(),
            ));
        }
        if self.probe.wait_timeout_ms == 0 {
            return Err(TracerError::ConfigError(
                "probe.wait_timeout_ms must be greater than zero".to_string(),
            ));
        }
        for (key, ext) in [
            ("probe.capture_extension", &self.probe.capture_extension),
            ("dump.capture_extension", &self.dump.capture_extension),
        ] {
            if ext.trim().is_empty() || ext.contains('/') {
                return Err(TracerError::ConfigError(format!(
                    "{} must be a bare file extension, got {:?}",
                    key, ext
                )));
            }
        }
        Ok(())
    }
}
