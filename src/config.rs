//! Optional user configuration in `<config dir>/dependamerge/config.toml`.
//!
//! Every key is optional. Command-line flags take precedence over values
//! read here, and values read here take precedence over built-in defaults.

use crate::compare::DEFAULT_THRESHOLD;
use crate::error::{Error, Result};
use crate::platform::DEFAULT_APPROVAL_MESSAGE;
use crate::types::MergeMethod;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Directory name under the platform config dir.
const CONFIG_DIR: &str = "dependamerge";

/// Filename for the config file.
const CONFIG_FILE: &str = "config.toml";

/// GitHub connection settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GitHubSettings {
    /// Token used when no flag, env var or `gh` login provides one
    pub token: Option<String>,
    /// GitHub Enterprise host (e.g. `github.example.com`)
    pub host: Option<String>,
}

/// Contents of the config file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Similarity threshold in `[0, 1]`
    pub threshold: f64,
    /// Merge method passed to the host
    pub merge_method: MergeMethod,
    /// Update out-of-date branches before merging
    pub fix: bool,
    /// Review body posted when approving
    pub approval_message: String,
    /// GitHub settings
    pub github: GitHubSettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            merge_method: MergeMethod::default(),
            fix: false,
            approval_message: DEFAULT_APPROVAL_MESSAGE.to_string(),
            github: GitHubSettings::default(),
        }
    }
}

impl Config {
    /// Check values that serde cannot check on its own.
    pub fn validate(&self) -> Result<()> {
        validate_threshold(self.threshold)?;
        Ok(())
    }
}

/// Reject thresholds outside `[0, 1]` (and NaN).
pub fn validate_threshold(threshold: f64) -> Result<f64> {
    if (0.0..=1.0).contains(&threshold) {
        Ok(threshold)
    } else {
        Err(Error::InvalidThreshold(threshold))
    }
}

/// Default config file location, if the platform has a config dir.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILE))
}

/// Load config from `path`, or from the default location when `None`.
///
/// A missing file at the default location yields defaults. A missing file
/// that was named explicitly is an error.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => {
            if !path.exists() {
                return Err(Error::Config(format!(
                    "config file {} does not exist",
                    path.display()
                )));
            }
            load_from(path)
        }
        None => match default_config_path() {
            Some(path) if path.exists() => load_from(&path),
            _ => Ok(Config::default()),
        },
    }
}

/// Read and validate a config file.
pub fn load_from(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("failed to read {}: {e}", path.display())))?;

    let config: Config = toml::from_str(&content)
        .map_err(|e| Error::Config(format!("failed to parse {}: {e}", path.display())))?;

    config.validate()?;
    Ok(config)
}
