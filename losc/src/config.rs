//! Configuration for LOSC clients.
//!
//! Config file resolution order:
//! 1. Explicit path passed to `Config::load_from()`
//! 2. LOSC_CONFIG environment variable
//! 3. `config.toml` in the platform config directory
//! 4. Built-in defaults when no file exists
//!
//! LOSC_HOST, when set, overrides the configured host.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Environment variable naming an explicit config file.
pub const LOSC_CONFIG_VAR: &str = "LOSC_CONFIG";

/// Environment variable overriding the API host.
pub const LOSC_HOST_VAR: &str = "LOSC_HOST";

/// LOSC client configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the archive API.
    #[serde(default = "default_host")]
    pub host: String,

    /// HTTP request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Default file format for URL queries.
    #[serde(default = "default_format")]
    pub format: String,

    /// Default sample rate in Hz for URL queries.
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,
}

fn default_host() -> String {
    crate::api::DEFAULT_HOST.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_format() -> String {
    "hdf5".to_string()
}

fn default_sample_rate() -> u32 {
    4096
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            timeout_secs: default_timeout_secs(),
            format: default_format(),
            sample_rate: default_sample_rate(),
        }
    }
}

impl Config {
    /// Load config using the standard resolution order.
    pub fn load() -> Result<Self> {
        let mut config = match resolve_config_path() {
            Some(path) => Self::load_from(&path)?,
            None => Self::default(),
        };
        if let Ok(host) = std::env::var(LOSC_HOST_VAR) {
            config.host = host;
        }
        Ok(config)
    }

    /// Load config from a specific file, or defaults if it does not exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("no config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)?;
        toml::from_str(&contents).map_err(|e| {
            Error::Config(format!("Failed to parse config {}: {}", path.display(), e))
        })
    }

    /// Save config to a specific file.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Render as TOML.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))
    }
}

/// Path of the config file that `Config::load()` reads, if any is known.
pub fn resolve_config_path() -> Option<PathBuf> {
    // 1. Environment variable
    if let Ok(path) = std::env::var(LOSC_CONFIG_VAR) {
        return Some(PathBuf::from(path));
    }

    // 2. Platform config directory (via directories crate)
    ProjectDirs::from("", "", "losc").map(|dirs| dirs.config_dir().join("config.toml"))
}
