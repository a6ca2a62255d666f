use chrono::NaiveDate;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::parser::types::RequirementsFormat;

// =============================================================================
// Registry-related constants
// =============================================================================

/// Public PyPI index
pub const DEFAULT_PYPI_REGISTRY: &str = "https://pypi.org";

/// Timeout for a single registry fetch in seconds
pub const FETCH_TIMEOUT_SECS: u64 = 30;

/// User agent sent with every registry request
pub const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Environment variable holding the log filter
pub const LOG_ENV: &str = "DELTAVER_LOG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Audit configuration
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct DeltaverConfig {
    /// Requirements file format, detected from the file name when unset
    pub file_format: Option<RequirementsFormat>,
    /// Fail when the average delta exceeds this many days (0 disables)
    pub fail_on_avg: i64,
    /// Fail when the largest delta exceeds this many days (0 disables)
    pub fail_on_max: i64,
    /// Alternate registry base URL, e.g. an Artifactory PyPI remote
    pub artifactory_domain: Option<String>,
    /// Package names to skip
    pub excluded: Vec<String>,
    /// Report deltas as they stood on this date
    pub for_date: Option<NaiveDate>,
    /// Treat versions ahead of the registry's latest as current
    pub overtaking_safe: bool,
}

/// Values given on the command line, each one replacing the config file's
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub file_format: Option<RequirementsFormat>,
    pub fail_on_avg: Option<i64>,
    pub fail_on_max: Option<i64>,
    pub artifactory_domain: Option<String>,
    pub excluded: Vec<String>,
    pub for_date: Option<NaiveDate>,
    pub overtaking_safe: bool,
}

impl DeltaverConfig {
    /// Load a JSON config file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load `path` if given, else the default config file if it exists, else defaults
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let default_path = config_path();
                if default_path.is_file() {
                    Self::from_file(&default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn apply(mut self, overrides: ConfigOverrides) -> Self {
        if overrides.file_format.is_some() {
            self.file_format = overrides.file_format;
        }
        if let Some(avg) = overrides.fail_on_avg {
            self.fail_on_avg = avg;
        }
        if let Some(max) = overrides.fail_on_max {
            self.fail_on_max = max;
        }
        if overrides.artifactory_domain.is_some() {
            self.artifactory_domain = overrides.artifactory_domain;
        }
        if overrides.for_date.is_some() {
            self.for_date = overrides.for_date;
        }
        self.excluded.extend(overrides.excluded);
        self.overtaking_safe |= overrides.overtaking_safe;
        self
    }
}

/// Returns the path to the default config file.
/// Uses $XDG_CONFIG_HOME/deltaver/config.json if XDG_CONFIG_HOME is set,
/// otherwise falls back to ~/.config/deltaver/config.json,
/// or ./deltaver/config.json if neither is available.
pub fn config_path() -> PathBuf {
    config_path_with_env(std::env::var("XDG_CONFIG_HOME").ok(), dirs::home_dir())
}

fn config_path_with_env(xdg_config_home: Option<String>, home_dir: Option<PathBuf>) -> PathBuf {
    let config_dir = xdg_config_home
        .map(PathBuf::from)
        .or_else(|| home_dir.map(|home| home.join(".config")))
        .unwrap_or_else(|| PathBuf::from("."));

    config_dir.join("deltaver").join("config.json")
}
