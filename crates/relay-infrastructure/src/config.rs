//! Application configuration.
//!
//! Loaded from `config.toml` in the relay config directory; the
//! `RELAY_WEBHOOK_URL` environment variable overrides the file.

use crate::paths::RelayPaths;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable overriding the configured webhook endpoint.
pub const WEBHOOK_URL_ENV: &str = "RELAY_WEBHOOK_URL";

fn default_request_timeout_secs() -> u64 {
    30
}

/// Relay application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelayConfig {
    /// Webhook endpoint producing assistant replies; absent means demo mode
    pub webhook_url: Option<String>,
    /// Per-request timeout for the webhook transport
    pub request_timeout_secs: u64,
    /// Where exports are written; defaults to the exports directory under
    /// the data dir
    pub export_dir: Option<PathBuf>,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            webhook_url: None,
            request_timeout_secs: default_request_timeout_secs(),
            export_dir: None,
        }
    }
}

impl RelayConfig {
    /// Loads the configuration from the given file.
    ///
    /// An absent file yields the defaults; a malformed file is an error.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    /// Loads the configuration from the default location.
    pub fn load_default() -> Result<Self> {
        let path = RelayPaths::config_file().context("Failed to resolve config file path")?;
        Self::load(&path)
    }

    /// Applies environment overrides on top of the file values.
    pub fn apply_env(mut self) -> Self {
        if let Ok(url) = std::env::var(WEBHOOK_URL_ENV) {
            if !url.trim().is_empty() {
                self.webhook_url = Some(url);
            }
        }
        self
    }
}
