//! Client configuration.
//!
//! The base address and request timeout are resolved from, in increasing
//! priority: built-in defaults, an optional config file at
//! `~/.config/chronicle/config.json`, and the `CHRONICLE_API_BASE_URL` /
//! `CHRONICLE_TIMEOUT_SECS` environment variables.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Application name used for config directory paths
const APP_NAME: &str = "chronicle";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Base address used when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

pub const BASE_URL_ENV: &str = "CHRONICLE_API_BASE_URL";
pub const TIMEOUT_ENV: &str = "CHRONICLE_TIMEOUT_SECS";

/// HTTP request timeout in seconds.
/// 30s allows for slow API responses while failing fast enough for good UX.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Settings the `ApiClient` is constructed from. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

/// On-disk configuration. Every field is optional; unset fields fall back
/// to the environment and then to defaults.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse config file {}", path.display()))
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Apply environment overrides using the given lookup.
    pub fn with_env<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(BASE_URL_ENV).filter(|v| !v.trim().is_empty()) {
            self.base_url = Some(url.trim().to_string());
        }
        if let Some(raw) = lookup(TIMEOUT_ENV).filter(|v| !v.trim().is_empty()) {
            let secs = raw
                .trim()
                .parse::<u64>()
                .with_context(|| format!("{} must be a whole number of seconds, got '{}'", TIMEOUT_ENV, raw))?;
            self.timeout_secs = Some(secs);
        }
        Ok(self)
    }

    pub fn client_config(&self) -> ClientConfig {
        let base_url = self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL);
        let timeout = Duration::from_secs(self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS));
        ClientConfig::new(base_url).with_timeout(timeout)
    }

    /// Load the config file and apply the process environment on top.
    pub fn resolve() -> Result<ClientConfig> {
        let config = Self::load()?.with_env(|key| std::env::var(key).ok())?;
        Ok(config.client_config())
    }
}
