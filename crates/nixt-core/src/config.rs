//! Configuration file support
//!
//! Loads configuration from ~/.config/nixt/config.toml

use crate::dashboard::DEFAULT_SESSION_TTL_HOURS;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default backend for the auth and dashboard APIs.
pub const DEFAULT_API_URL: &str = "http://localhost:3003/api/v1";

/// Environment variable overriding `[api] base_url`.
pub const API_URL_ENV: &str = "NIXT_API_URL";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NixtConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub dashboard: DashboardConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Versioned API prefix, e.g. `https://host/api/v1`
    #[serde(default = "default_api_url")]
    pub base_url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Database path; defaults to `<NIXT_DIR>/nixt.db`
    pub db_path: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardConfig {
    #[serde(default = "default_session_ttl_hours")]
    pub session_ttl_hours: i64,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_session_ttl_hours() -> i64 {
    DEFAULT_SESSION_TTL_HOURS
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_api_url(),
        }
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            session_ttl_hours: default_session_ttl_hours(),
        }
    }
}

impl NixtConfig {
    /// Load configuration from the default path, then apply environment
    /// overrides.
    pub fn load() -> Self {
        let mut config = Self::load_from_path(Self::default_path());
        config.apply_env();
        config
    }

    /// Load configuration from a specific path. A missing or unparsable
    /// file yields defaults.
    pub fn load_from_path(path: Option<PathBuf>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };

        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(&path) {
            Ok(content) => toml::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!(path = %path.display(), error = %e, "Ignoring invalid config file");
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// Get the default configuration file path
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("nixt").join("config.toml"))
    }

    fn apply_env(&mut self) {
        if let Ok(url) = std::env::var(API_URL_ENV)
            && !url.trim().is_empty()
        {
            self.api.base_url = url;
        }
    }

    /// Negative values mean zero; values past chrono's range saturate.
    pub fn session_ttl(&self) -> chrono::Duration {
        chrono::Duration::try_hours(self.dashboard.session_ttl_hours.max(0))
            .unwrap_or(chrono::Duration::MAX)
    }
}
