//! Built-in defaults as the lowest-precedence source.

use crate::config::TracerConfig;
use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError, File, FileFormat};

/// Start a builder seeded with `TracerConfig::default()`.
pub fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let defaults = toml::to_string(&TracerConfig::default())
        .map_err(|e| ConfigError::Message(format!("Failed to encode defaults: {}", e)))?;
    Ok(config::Config::builder().add_source(File::from_str(&defaults, FileFormat::Toml)))
}
