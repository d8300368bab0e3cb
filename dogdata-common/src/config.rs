//! Bootstrap configuration loading and logging setup
//!
//! Services resolve settings in priority order: command-line argument,
//! environment variable, TOML config file, compiled default. This module
//! owns the TOML and default tiers.
//!
//! A missing TOML file is never fatal: a warning is logged and compiled
//! defaults are used. A file that exists but cannot be parsed is a
//! configuration error.

use crate::{Error, Result};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Application directory name used under the platform config/data dirs
pub const APP_DIR_NAME: &str = "dogdata";

/// Logging configuration
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Default TOML config location for the platform
///
/// Linux: `~/.config/dogdata/config.toml`, falling back to
/// `/etc/dogdata/config.toml` when the user file is absent.
pub fn default_config_path() -> PathBuf {
    let user_config = dirs::config_dir().map(|d| d.join(APP_DIR_NAME).join("config.toml"));

    if cfg!(target_os = "linux") {
        if let Some(path) = &user_config {
            if path.exists() {
                return path.clone();
            }
        }
        let system_config = PathBuf::from("/etc").join(APP_DIR_NAME).join("config.toml");
        if system_config.exists() {
            return system_config;
        }
    }

    user_config.unwrap_or_else(|| PathBuf::from("config.toml"))
}

/// OS-dependent default data folder (database lives here)
pub fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join(APP_DIR_NAME))
        .unwrap_or_else(|| PathBuf::from("./dogdata_data"))
}

/// Load a TOML configuration file into `T`
///
/// Missing file: warning + `T::default()`. Unreadable or malformed file:
/// `Error::Config`.
pub fn load_toml<T>(path: &Path) -> Result<T>
where
    T: DeserializeOwned + Default,
{
    if !path.exists() {
        warn!(
            "Config file not found at {}, using built-in defaults",
            path.display()
        );
        return Ok(T::default());
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;

    let config = toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))?;

    info!("Loaded configuration from {}", path.display());
    Ok(config)
}

/// Initialize the global tracing subscriber
///
/// `RUST_LOG` wins when set; otherwise `level` applies to every target.
pub fn init_tracing(logging: &LoggingConfig) {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&logging.level)),
        )
        .init();
}
