//! `AppConfig` struct and TOML loading.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use moviez_api::tmdb::{DEFAULT_BASE_URL, DEFAULT_IMAGE_BASE_URL};
use serde::Deserialize;

/// Environment variable holding the TMDB bearer token.
pub const TOKEN_ENV_VAR: &str = "TMDB_API_TOKEN";

/// Directory under `$HOME/.config`.
const APP_DIR: &str = "moviez";

/// Config file name inside the config directory.
const CONFIG_FILE: &str = "config.toml";

/// Top-level application configuration.
#[derive(Debug, Deserialize, Default, PartialEq, Eq)]
pub struct AppConfig {
    /// TMDB connection settings.
    #[serde(default)]
    pub tmdb: TmdbConfig,
}

/// TMDB connection configuration.
#[derive(Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TmdbConfig {
    /// API base URL.
    pub base_url: String,
    /// Image service base URL (poster links).
    pub image_base_url: String,
    /// Response language.
    pub language: String,
    /// Bearer token. `TMDB_API_TOKEN` takes precedence.
    pub api_token: Option<String>,
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            base_url: String::from(DEFAULT_BASE_URL),
            image_base_url: String::from(DEFAULT_IMAGE_BASE_URL),
            language: String::from("en-US"),
            api_token: None,
        }
    }
}

impl AppConfig {
    /// Config file location: `{dir}/config.toml` when `--dir` is given,
    /// else `$HOME/.config/moviez/config.toml`.
    ///
    /// # Errors
    ///
    /// Returns an error if `dir` is `None` and `HOME` is not set.
    pub fn default_path(dir: Option<&Path>) -> Result<PathBuf> {
        let config_dir = match dir {
            Some(dir) => dir.to_path_buf(),
            None => {
                let home =
                    std::env::var_os("HOME").context("HOME environment variable is not set")?;
                PathBuf::from(home).join(".config").join(APP_DIR)
            }
        };
        Ok(config_dir.join(CONFIG_FILE))
    }

    /// Loads config from a TOML file. Returns default if file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
    }
}

impl TmdbConfig {
    /// Resolves the bearer token: `env_token` first, then the config value.
    ///
    /// Blank values count as unset.
    ///
    /// # Errors
    ///
    /// Returns an error if neither source provides a token.
    pub fn resolve_token(&self, env_token: Option<String>) -> Result<String> {
        env_token
            .filter(|t| !t.trim().is_empty())
            .or_else(|| {
                self.api_token
                    .clone()
                    .filter(|t| !t.trim().is_empty())
            })
            .with_context(|| {
                format!("{TOKEN_ENV_VAR} environment variable or tmdb.api_token config is required")
            })
    }
}
