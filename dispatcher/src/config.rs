//! Configuration for one pipeline run.

use std::path::PathBuf;

use filealert_directory_watcher::WatchConfig;
use filealert_notifier::TransportConfig;
use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, Result};

/// Everything a run needs, built once and never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory tree to monitor.
    pub watch_root: PathBuf,

    /// Outbound mail settings.
    pub transport: TransportConfig,
}

impl Config {
    /// Create a new configuration.
    pub fn new(watch_root: impl Into<PathBuf>, transport: TransportConfig) -> Self {
        Self {
            watch_root: watch_root.into(),
            transport,
        }
    }

    /// Check required settings and that the watch root is a directory.
    pub fn validate(&self) -> Result<()> {
        let mut missing = Vec::new();
        if self.watch_root.as_os_str().is_empty() {
            missing.push("watch root");
        }
        missing.extend(self.transport.missing_fields());

        if !missing.is_empty() {
            return Err(PipelineError::Config(format!(
                "missing required settings: {}",
                missing.join(", ")
            )));
        }

        if !self.watch_root.exists() {
            return Err(PipelineError::Config(format!(
                "watch root does not exist: {}",
                self.watch_root.display()
            )));
        }

        if !self.watch_root.is_dir() {
            return Err(PipelineError::Config(format!(
                "watch root is not a directory: {}",
                self.watch_root.display()
            )));
        }

        Ok(())
    }

    /// Watcher settings derived from this config.
    pub fn watch_config(&self) -> WatchConfig {
        WatchConfig::new(&self.watch_root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn transport() -> TransportConfig {
        TransportConfig::new("me@example.com", "secret", "you@example.com")
    }

    #[test]
    fn test_valid_config() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config::new(temp_dir.path(), transport());

        assert!(config.validate().is_ok());
        assert_eq!(config.watch_config().root, temp_dir.path());
    }

    #[test]
    fn test_missing_settings_are_listed() {
        let config = Config::new("", TransportConfig::default());

        let err = config.validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "configuration error: missing required settings: watch root, username, secret, recipient"
        );
    }

    #[test]
    fn test_missing_root() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config::new(temp_dir.path().join("nope"), transport());

        let err = config.validate().unwrap_err();
        assert!(matches!(err, PipelineError::Config(_)));
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn test_root_is_a_file() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("file.txt");
        std::fs::write(&file, "x").unwrap();

        let err = Config::new(&file, transport()).validate().unwrap_err();
        assert!(err.to_string().contains("not a directory"));
    }
}
