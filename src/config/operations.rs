//! Config loading, validation, and utility operations.

use super::model::Config;
use crate::error::{Result, TrustError};
use regex::Regex;
use std::path::Path;

impl Config {
    /// Load config from a YAML file.
    ///
    /// Unknown fields in the YAML are silently ignored for forward compatibility.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path).map_err(|e| {
            TrustError::ConfigError(format!(
                "failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        Self::from_yaml(&content)
    }

    /// Parse config from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(yaml)
            .map_err(|e| TrustError::ConfigError(format!("failed to parse config YAML: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Serialize config to YAML string.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| {
            TrustError::ConfigError(format!("failed to serialize config to YAML: {}", e))
        })
    }

    /// Validate config values.
    ///
    /// - `trust_dir` must be non-empty
    /// - `skip_regex` must compile
    pub fn validate(&self) -> Result<()> {
        if self.trust_dir.as_os_str().is_empty() {
            return Err(TrustError::ConfigError(
                "config validation failed: trust_dir must not be empty".to_string(),
            ));
        }

        self.skip_matcher()?;
        Ok(())
    }

    /// Compile `skip_regex`, or `None` when it is empty.
    pub fn skip_matcher(&self) -> Result<Option<Regex>> {
        if self.skip_regex.is_empty() {
            return Ok(None);
        }

        Regex::new(&self.skip_regex).map(Some).map_err(|e| {
            TrustError::ConfigError(format!(
                "invalid skip_regex '{}' - {}",
                self.skip_regex, e
            ))
        })
    }

    /// Whether backups are enabled.
    pub fn backups_enabled(&self) -> bool {
        !self.backup_dir.trim().is_empty()
    }
}
