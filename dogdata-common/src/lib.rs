//! # Dog Data Common Library
//!
//! Shared code for the dog reference-data service:
//! - Error and result types
//! - Bootstrap configuration (TOML + environment) and logging setup
//! - SQLite database initialization
//! - Timestamp and identifier helpers

pub mod config;
pub mod db;
pub mod error;
pub mod record_id;
pub mod time;

pub use error::{Error, Result};
