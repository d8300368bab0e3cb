//! Errors raised while bootstrapping the service (config files, database setup)

use thiserror::Error;

/// Result type for bootstrap operations
pub type Result<T> = std::result::Result<T, Error>;

/// Bootstrap failure
#[derive(Error, Debug)]
pub enum Error {
    /// Opening or preparing the SQLite store failed
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Creating the data directory or reading a file failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML configuration could not be read or parsed
    #[error("Configuration error: {0}")]
    Config(String),
}
