//! Config loading and validation.

use super::model::Config;
use crate::error::{CleanerError, Result};
use std::path::Path;

impl Config {
    /// Load config from a YAML file.
    ///
    /// # Returns
    ///
    /// * `Ok(Config)` - Successfully loaded and validated config
    /// * `Err(CleanerError::Config)` - Read error, parse error or validation failure
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path).map_err(|e| {
            CleanerError::Config(format!(
                "failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        Self::from_yaml(&content)
    }

    /// Parse config from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        // An empty document deserializes to unit, not a map.
        if yaml.trim().is_empty() {
            return Ok(Config::default());
        }

        let config: Config = serde_yaml::from_str(yaml)
            .map_err(|e| CleanerError::Config(format!("failed to parse config YAML: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate config values.
    ///
    /// - `jobs` must be positive
    /// - `output_dir` must be non-empty
    pub fn validate(&self) -> Result<()> {
        if self.jobs == 0 {
            return Err(CleanerError::Config(
                "config validation failed: jobs must be greater than 0".to_string(),
            ));
        }

        if self.output_dir.trim().is_empty() {
            return Err(CleanerError::Config(
                "config validation failed: output_dir must be non-empty".to_string(),
            ));
        }

        Ok(())
    }
}
