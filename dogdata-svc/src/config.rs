//! Configuration for dogdata-svc
//!
//! Priority: command-line flag → environment variable (both via clap) →
//! TOML file → compiled default.

use clap::Parser;
use dogdata_common::config::{default_config_path, default_data_dir, load_toml, LoggingConfig};
use dogdata_common::Result;
use serde::Deserialize;
use std::path::PathBuf;

use crate::services::{LifecycleSettings, OverlapPolicy};

/// Default HTTP port
pub const DEFAULT_PORT: u16 = 8088;

/// Command-line arguments
#[derive(Parser, Debug, Default)]
#[command(name = "dogdata-svc")]
#[command(about = "Per-breed dog age-band reference data service")]
#[command(version)]
pub struct Args {
    /// Port to listen on
    #[arg(short, long, env = "DOGDATA_PORT")]
    pub port: Option<u16>,

    /// Address to bind
    #[arg(long, env = "DOGDATA_HOST")]
    pub host: Option<String>,

    /// SQLite database file
    #[arg(short, long, env = "DOGDATA_DATABASE")]
    pub database: Option<PathBuf>,

    /// TOML configuration file
    #[arg(short, long, env = "DOGDATA_CONFIG")]
    pub config: Option<PathBuf>,
}

impl Args {
    /// TOML file to read: `--config`/`DOGDATA_CONFIG`, else the platform default
    pub fn config_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(default_config_path)
    }
}

/// Validation behaviour (`[validation]` table)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    pub overlap_policy: OverlapPolicy,
    pub revalidate_updates: bool,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        let settings = LifecycleSettings::default();
        Self {
            overlap_policy: settings.overlap_policy,
            revalidate_updates: settings.revalidate_updates,
        }
    }
}

/// Resolved service configuration
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub database_path: Option<PathBuf>,
    pub host: String,
    pub port: u16,
    pub logging: LoggingConfig,
    pub validation: ValidationConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            database_path: None,
            host: "127.0.0.1".to_string(),
            port: DEFAULT_PORT,
            logging: LoggingConfig::default(),
            validation: ValidationConfig::default(),
        }
    }
}

impl ServiceConfig {
    /// Load the TOML tier and apply CLI/env overrides on top
    pub fn resolve(args: &Args) -> Result<Self> {
        let mut config: ServiceConfig = load_toml(&args.config_path())?;

        if let Some(port) = args.port {
            config.port = port;
        }
        if let Some(host) = &args.host {
            config.host = host.clone();
        }
        if let Some(database) = &args.database {
            config.database_path = Some(database.clone());
        }

        Ok(config)
    }

    pub fn database_path(&self) -> PathBuf {
        self.database_path
            .clone()
            .unwrap_or_else(|| default_data_dir().join("dogdata.db"))
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn lifecycle_settings(&self) -> LifecycleSettings {
        LifecycleSettings {
            overlap_policy: self.validation.overlap_policy,
            revalidate_updates: self.validation.revalidate_updates,
        }
    }
}
