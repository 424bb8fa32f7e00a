use serde::{Deserialize, Serialize};

use super::dataset::DatasetConfig;
use super::errors::ConfigError;
use super::filter::FilterConfig;
use super::logging::LoggingConfig;

const LOCAL_CONFIG: &str = "kabysdoh.toml";
const SYSTEM_CONFIG: &str = "/etc/kabysdoh/config.toml";

/// Main configuration structure
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub dataset: DatasetConfig,

    #[serde(default)]
    pub filter: FilterConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from file or use defaults
    ///
    /// Priority order:
    /// 1. Explicitly provided path
    /// 2. kabysdoh.toml in current directory
    /// 3. /etc/kabysdoh/config.toml
    /// 4. Default configuration
    pub fn load(path: Option<&str>, cli_overrides: CliOverrides) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = path {
            Self::from_file(path)?
        } else if std::path::Path::new(LOCAL_CONFIG).exists() {
            Self::from_file(LOCAL_CONFIG)?
        } else if std::path::Path::new(SYSTEM_CONFIG).exists() {
            Self::from_file(SYSTEM_CONFIG)?
        } else {
            Self::default()
        };

        config.apply_cli_overrides(cli_overrides);
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileRead(path.to_string(), e.to_string()))?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    fn apply_cli_overrides(&mut self, overrides: CliOverrides) {
        if let Some(path) = overrides.dataset_path {
            self.dataset.path = path;
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.dataset.path.is_empty() {
            return Err(ConfigError::Validation(
                "Dataset path cannot be empty".to_string(),
            ));
        }
        if self.filter.stash_capacity == 0 {
            return Err(ConfigError::Validation(
                "stash_capacity must be at least 1".to_string(),
            ));
        }
        if self.filter.max_subqueries == 0 {
            return Err(ConfigError::Validation(
                "max_subqueries must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Command-line overrides for configuration
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub dataset_path: Option<String>,
    pub log_level: Option<String>,
}
