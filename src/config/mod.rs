//! Configuration module for the porter build pipeline
//!
//! Provides types and parsing for `porter.toml` project configuration.

pub mod loader;
pub mod schema;

pub use loader::{load_project, ConfigError, LoadedConfig};
pub use schema::*;
