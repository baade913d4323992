// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Configuration management
//!
//! Layers, lowest precedence first: built-in defaults, a TOML file, then
//! `CAREERLINE_*` environment variables.

use crate::cache::DEFAULT_FRESHNESS;
use crate::client::{ClientOptions, GITHUB_API_BASE};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Account whose repositories feed the live timeline by default
pub const DEFAULT_ACCOUNT: &str = "gregoryStarr";

/// Environment variable prefix for overrides
pub const ENV_PREFIX: &str = "CAREERLINE";

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// GitHub account to build the live timeline from
    pub account: String,
    /// GitHub API host
    pub api_base: String,
    /// Seconds a cached API response stays reusable
    pub cache_ttl_secs: u64,
    /// `User-Agent` sent with every request
    pub user_agent: String,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Catalog file replacing the built-in one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        let client = ClientOptions::default();
        Self {
            account: DEFAULT_ACCOUNT.to_string(),
            api_base: GITHUB_API_BASE.to_string(),
            cache_ttl_secs: DEFAULT_FRESHNESS.as_secs(),
            user_agent: client.user_agent,
            log_level: "info".to_string(),
            catalog_path: None,
        }
    }
}

impl Config {
    /// Options for building a [`crate::client::GitHubClient`]
    #[must_use]
    pub fn client_options(&self) -> ClientOptions {
        ClientOptions {
            api_base: self.api_base.clone(),
            user_agent: self.user_agent.clone(),
            freshness: Duration::from_secs(self.cache_ttl_secs),
        }
    }

    /// Render as TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize configuration")
    }
}

/// Default location of the config file
#[must_use]
pub fn default_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("com", "hyperpolymath", "careerline")
        .map(|d| d.config_dir().join("config.toml"))
}

/// Load configuration
///
/// An explicit `path` must exist; the default location is optional.
pub fn load(path: Option<&Path>) -> Result<Config> {
    let defaults = ::config::Config::try_from(&Config::default())
        .context("Failed to build default configuration")?;

    let mut builder = ::config::Config::builder().add_source(defaults);

    match path {
        Some(path) => {
            builder = builder.add_source(::config::File::from(path).required(true));
        }
        None => {
            if let Some(path) = default_path() {
                builder = builder.add_source(::config::File::from(path).required(false));
            }
        }
    }

    builder
        .add_source(::config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
        .build()
        .context("Failed to load configuration")?
        .try_deserialize()
        .context("Invalid configuration")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.account, DEFAULT_ACCOUNT);
        assert_eq!(config.cache_ttl_secs, 300);
        assert!(config.user_agent.starts_with("careerline/"));
        assert_eq!(config.client_options().freshness, Duration::from_secs(300));
    }

    #[test]
    fn test_file_overrides_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "account = \"octocat\"\ncache_ttl_secs = 60").unwrap();

        let config = load(Some(file.path())).unwrap();
        assert_eq!(config.account, "octocat");
        assert_eq!(config.cache_ttl_secs, 60);
        assert_eq!(config.api_base, GITHUB_API_BASE);
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load(Some(&dir.path().join("absent.toml"))).is_err());
    }

    #[test]
    fn test_toml_round_trip_omits_unset_catalog() {
        let rendered = Config::default().to_toml().unwrap();
        assert!(rendered.contains("account = \"gregoryStarr\""));
        assert!(!rendered.contains("catalog_path"));
    }
}
