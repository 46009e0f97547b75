use crate::shared::error::ConfigError;
use log::info;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Environment variable consulted when no config path is passed on the command line.
pub const CONFIG_ENV_VAR: &str = "RESOURCE_LENS_CONFIG";

pub const DEFAULT_UPDATE_INTERVAL_MS: u64 = 1000;
pub const MIN_UPDATE_INTERVAL_MS: u64 = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    pub update_interval_ms: u64,
    pub show_cpu: bool,
    pub show_memory: bool,
    pub show_gpu: bool,
    pub output: OutputFormat,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            update_interval_ms: DEFAULT_UPDATE_INTERVAL_MS,
            show_cpu: true,
            show_memory: true,
            show_gpu: true,
            output: OutputFormat::Text,
        }
    }
}

impl MonitorConfig {
    pub fn from_yaml(contents: &str) -> Result<Self, ConfigError> {
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(contents)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let config = Self::from_yaml(&contents)?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Resolve the config from an explicit path, then `RESOURCE_LENS_CONFIG`, then defaults.
    pub fn load(explicit: Option<&str>) -> Result<Self, ConfigError> {
        let path = explicit
            .map(str::to_string)
            .or_else(|| std::env::var(CONFIG_ENV_VAR).ok().filter(|p| !p.is_empty()));

        match path {
            Some(path) => Self::from_file(path),
            None => {
                info!("No configuration file given, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Polling period, never shorter than 500 ms.
    pub fn update_interval(&self) -> Duration {
        Duration::from_millis(self.update_interval_ms.max(MIN_UPDATE_INTERVAL_MS))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let config = MonitorConfig::from_yaml("").unwrap();
        assert_eq!(config, MonitorConfig::default());
        assert_eq!(config.update_interval(), Duration::from_millis(1000));
    }

    #[test]
    fn partial_document_keeps_other_defaults() {
        let config = MonitorConfig::from_yaml("show_gpu: false\noutput: json\n").unwrap();
        assert!(!config.show_gpu);
        assert!(config.show_cpu);
        assert!(config.show_memory);
        assert_eq!(config.output, OutputFormat::Json);
        assert_eq!(config.update_interval_ms, DEFAULT_UPDATE_INTERVAL_MS);
    }

    #[test]
    fn interval_is_clamped_to_minimum() {
        let config = MonitorConfig::from_yaml("update_interval_ms: 100").unwrap();
        assert_eq!(config.update_interval(), Duration::from_millis(500));

        let config = MonitorConfig::from_yaml("update_interval_ms: 2500").unwrap();
        assert_eq!(config.update_interval(), Duration::from_millis(2500));
    }

    #[test]
    fn invalid_yaml_is_rejected() {
        let err = MonitorConfig::from_yaml("update_interval_ms: soon").unwrap_err();
        assert!(matches!(err, ConfigError::Yaml(_)));
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let err = MonitorConfig::load(Some("/nonexistent/resource-lens.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
