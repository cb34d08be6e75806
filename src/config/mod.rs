//! Configuration management for storaudit

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, Result};

/// Default token name searched for in browser storage
pub const DEFAULT_TOKEN_NAME: &str = "eva-tk";

/// Default result file written after a scan
pub const DEFAULT_OUTPUT_FILE: &str = "extracted-tokens.json";

fn default_token_name() -> String {
    DEFAULT_TOKEN_NAME.to_string()
}

fn default_window_before() -> usize {
    200
}

fn default_window_after() -> usize {
    2000
}

/// Application configuration
///
/// Loaded from `~/.storaudit/config.yaml` when present; every field has a
/// default so the tool runs without any configuration at all. CLI flags
/// override file values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Token name searched for in browser storage
    #[serde(default = "default_token_name")]
    pub token_name: String,

    /// Proximity-window tuning for the Chromium-family scanner
    #[serde(default)]
    pub window: WindowConfig,

    /// Result file path for extracted tokens
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,
}

/// Byte window taken around the token name before pattern matching.
///
/// Tuning values, not load-bearing: widening them trades false negatives
/// (token written far from its key) against false positives.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowConfig {
    /// Bytes kept before the first token-name occurrence
    #[serde(default = "default_window_before")]
    pub before: usize,

    /// Bytes kept after the first token-name occurrence
    #[serde(default = "default_window_after")]
    pub after: usize,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            before: default_window_before(),
            after: default_window_after(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            token_name: default_token_name(),
            window: WindowConfig::default(),
            output: None,
        }
    }
}

impl Config {
    /// Get the default config file path (~/.storaudit/config.yaml)
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or(ConfigError::NoHome)?;
        Ok(home.join(".storaudit").join("config.yaml"))
    }

    /// Load configuration, honoring an explicit path override.
    ///
    /// An explicit path must exist; the default path is optional and falls
    /// back to built-in defaults when absent.
    pub fn load_at(path: Option<&str>) -> Result<Self> {
        match path {
            Some(p) => {
                let path = PathBuf::from(p);
                if !path.exists() {
                    return Err(ConfigError::NotFound(p.to_string()).into());
                }
                Self::load_from(&path)
            }
            None => {
                let path = Self::default_path()?;
                if path.exists() {
                    Self::load_from(&path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&contents).map_err(ConfigError::from)?;
        Ok(config)
    }

    /// Resolved result file path
    pub fn output_path(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_FILE))
    }
}
