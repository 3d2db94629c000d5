//! Configuration module for skyburst
//!
//! Provides types and parsing for `skyburst.toml` show configuration.

pub mod loader;
pub mod schema;

pub use loader::{load_config, merge_cli_overrides, CliOverrides, ConfigError};
pub use schema::*;
