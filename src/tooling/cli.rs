//! CLI Tooling
//!
//! Command-line surface: `--mode dump` converts capture files, `--mode probe`
//! runs bulk traceroutes from every connected agent.

use crate::capture::{CaptureFileFactory, JsonLinesCaptureSource};
use crate::config::{ConfigLoader, TracerConfig};
use crate::control::{MeasurementControl, MuxBridgeControl};
use crate::dump::{run_dump, DumpStats};
use crate::error::TracerError;
use crate::probe::{ProbeReport, ProbeRun, ProbeSettings};
use crate::targets::load_targets;
use crate::tooling::format::{format_dump_summary, format_probe_summary};
use clap::{Parser, ValueEnum};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::net::IpAddr;
use std::path::PathBuf;
use tracing::info;

/// Bulk traceroutes across a probing-agent fleet
#[derive(Parser, Debug)]
#[command(name = "bulktracer")]
#[command(about = "Bulk traceroute scheduling across Ark monitors, and capture-to-JSON conversion")]
#[command(
    after_help = "Progress, including each file processed in dump mode, is logged to stderr by default \
                  (see --log-output). Stdout carries only the final summary."
)]
pub struct Cli {
    /// Mode to use
    #[arg(long, value_enum)]
    pub mode: Mode,

    /// Target file to probe, one address per line
    #[arg(long)]
    pub targets: Option<PathBuf>,

    /// Configuration file path (layered over the global config)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Output file (dump) or directory (probe), overriding the config
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file, file+stderr, both)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output includes "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Collected data to process (dump mode)
    #[arg(value_name = "FILE")]
    pub files: Vec<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// Convert capture files to gzip-compressed JSON lines
    Dump,
    /// Run bulk traceroutes
    Probe,
}

impl Cli {
    /// Fold flags into the loaded config. `--log-file` is passed to
    /// `init_logging` directly so it outranks `BULKTRACER_LOG_FILE`.
    pub fn apply_overrides(&self, config: &mut TracerConfig) {
        if let Some(level) = &self.log_level {
            config.logging.level = level.clone();
        }
        if let Some(format) = &self.log_format {
            config.logging.format = format.clone();
        }
        if let Some(output) = &self.log_output {
            config.logging.output = output.clone();
        }
        if let Some(output) = &self.output {
            match self.mode {
                Mode::Dump => config.dump.output = output.clone(),
                Mode::Probe => config.probe.output_dir = output.clone(),
            }
        }
    }
}

/// Loaded configuration plus the operations the CLI can run.
pub struct CliContext {
    config: TracerConfig,
}

impl CliContext {
    /// Load config from `config_path` (or the default sources).
    pub fn new(config_path: Option<PathBuf>) -> Result<Self, TracerError> {
        let config = match &config_path {
            Some(path) => ConfigLoader::load_from_file(path)?,
            None => ConfigLoader::load()?,
        };
        Ok(Self { config })
    }

    pub fn with_config(config: TracerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TracerConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut TracerConfig {
        &mut self.config
    }

    /// Execute the selected mode and return the text to print.
    pub fn execute(&self, cli: &Cli) -> Result<String, TracerError> {
        match cli.mode {
            Mode::Dump => {
                let stats = self.dump(&cli.files)?;
                Ok(format_dump_summary(&self.config.dump.output, &stats))
            }
            Mode::Probe => {
                let targets = cli.targets.as_ref().ok_or_else(|| {
                    TracerError::MissingArgument("--targets is required in probe mode".to_string())
                })?;
                let targets = load_targets(targets)?;
                if targets.is_empty() {
                    return Err(TracerError::EmptyTargets);
                }
                let mut control = MuxBridgeControl::connect(&self.config.probe.mux_path)?;
                let report = self.probe(&mut control, &targets)?;
                Ok(format_probe_summary(&report))
            }
        }
    }

    pub fn dump(&self, files: &[PathBuf]) -> Result<DumpStats, TracerError> {
        run_dump(JsonLinesCaptureSource, &self.config.dump, files)
    }

    /// Probe every target through `control`, writing captures under the output dir.
    pub fn probe(
        &self,
        control: &mut dyn MeasurementControl,
        targets: &[IpAddr],
    ) -> Result<ProbeReport, TracerError> {
        let probe = &self.config.probe;
        let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S").to_string();
        let sinks = CaptureFileFactory::new(
            probe.output_dir.clone(),
            timestamp,
            probe.capture_extension.clone(),
        );
        let mut rng = match probe.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        info!(targets = targets.len(), mux = %probe.mux_path.display(), "Probe run starting");
        ProbeRun::new(control, &sinks, ProbeSettings::from(probe)).run(targets, &mut rng)
    }
}
