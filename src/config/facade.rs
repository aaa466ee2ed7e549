//! ConfigLoader facade delegating to merge service.

use super::merge::service::MergeService;
use super::TracerConfig;
use crate::error::TracerError;
use std::path::Path;

/// Configuration loader facade.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from the global file and environment.
    pub fn load() -> Result<TracerConfig, TracerError> {
        let config = MergeService::load(None)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration with a specific file layered over the global one.
    pub fn load_from_file(path: &Path) -> Result<TracerConfig, TracerError> {
        let config = MergeService::load(Some(path))?;
        config.validate()?;
        Ok(config)
    }
}
