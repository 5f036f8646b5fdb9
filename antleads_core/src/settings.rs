//! Client settings for reaching the widget backend.
//!
//! Layers, lowest precedence first: built-in defaults, the settings file at
//! `~/.config/antleads/settings.toml` (Unix) or `%APPDATA%/antleads/settings.toml`
//! (Windows), `ANTLEADS_*` environment variables, then explicit overrides.

use crate::error::WidgetError;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8001";
pub const ENV_BASE_URL: &str = "ANTLEADS_API_BASE_URL";
pub const ENV_TIMEOUT_SECS: &str = "ANTLEADS_HTTP_TIMEOUT_SECS";

#[derive(Debug, Clone, PartialEq)]
pub struct ClientSettings {
    pub base_url: Url,
    /// `None` leaves the transport default in place.
    pub timeout: Option<Duration>,
    pub user_agent: String,
}

/// On-disk shape; every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct SettingsFile {
    base_url: Option<String>,
    timeout_secs: Option<u64>,
    user_agent: Option<String>,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base URL is valid"),
            timeout: None,
            user_agent: format!("antleads-widget/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ClientSettings {
    pub fn default_path() -> PathBuf {
        let base = dirs::config_dir()
            .or_else(|| dirs::home_dir().map(|p| p.join(".config")))
            .unwrap_or_else(|| PathBuf::from("."));
        base.join("antleads").join("settings.toml")
    }

    /// Defaults, then the default settings file if present, then the environment.
    pub fn load() -> Result<Self, WidgetError> {
        let mut settings = Self::default();
        let path = Self::default_path();
        if path.exists() {
            settings = settings.apply_file(&path)?;
        }
        settings.apply_env_with(|key| std::env::var(key).ok())
    }

    pub fn apply_file(self, path: &Path) -> Result<Self, WidgetError> {
        let content = std::fs::read_to_string(path)?;
        self.apply_toml(&content)
    }

    pub fn apply_toml(mut self, content: &str) -> Result<Self, WidgetError> {
        let file: SettingsFile = toml::from_str(content)?;
        if let Some(base_url) = file.base_url {
            self = self.with_base_url(&base_url)?;
        }
        if let Some(secs) = file.timeout_secs {
            self.timeout = timeout_from_secs(secs);
        }
        if let Some(user_agent) = file.user_agent.filter(|ua| !ua.trim().is_empty()) {
            self.user_agent = user_agent;
        }
        Ok(self)
    }

    pub fn apply_env_with<F>(mut self, lookup: F) -> Result<Self, WidgetError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(base_url) = lookup(ENV_BASE_URL).filter(|v| !v.trim().is_empty()) {
            self = self.with_base_url(&base_url)?;
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_SECS).filter(|v| !v.trim().is_empty()) {
            let secs: u64 = raw.trim().parse().map_err(|_| {
                WidgetError::InvalidSettings(format!(
                    "{} must be a whole number of seconds, got '{}'",
                    ENV_TIMEOUT_SECS, raw
                ))
            })?;
            self.timeout = timeout_from_secs(secs);
        }
        Ok(self)
    }

    pub fn with_base_url(mut self, raw: &str) -> Result<Self, WidgetError> {
        let url = Url::parse(raw.trim())
            .map_err(|e| WidgetError::InvalidSettings(format!("Invalid base URL '{}': {}", raw, e)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(WidgetError::InvalidSettings(format!(
                "Base URL must use http or https, got '{}'",
                url.scheme()
            )));
        }
        self.base_url = url;
        Ok(self)
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

// Zero disables the timeout.
fn timeout_from_secs(secs: u64) -> Option<Duration> {
    (secs > 0).then(|| Duration::from_secs(secs))
}
