use super::ReportConfig;
use crate::error::{Error, Result};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Reads configuration layers from disk and the environment
pub struct ConfigLoader;

impl ConfigLoader {
    /// Parse a TOML configuration file.
    pub fn load_file(path: &Path) -> Result<ReportConfig> {
        let content = fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("cannot read config file {}: {}", path.display(), e))
        })?;
        let config: ReportConfig = toml::from_str(&content)?;
        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// File layer (if any), then environment, then `overrides`.
    pub fn load(config_file: Option<&Path>, overrides: ReportConfig) -> Result<ReportConfig> {
        let mut config = match config_file {
            Some(path) => Self::load_file(path)?,
            None => ReportConfig::new(),
        };
        config.merge_env_vars()?;
        config.merge(overrides);
        Ok(config)
    }
}
