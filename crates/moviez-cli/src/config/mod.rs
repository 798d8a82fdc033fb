//! Application configuration module.
//!
//! Reads the TOML config file holding TMDB connection settings
//! and resolves the API token.

#[allow(clippy::module_inception)]
mod config;

#[allow(clippy::module_name_repetitions)]
pub use config::{AppConfig, TOKEN_ENV_VAR, TmdbConfig};
