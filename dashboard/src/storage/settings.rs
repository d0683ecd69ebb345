//! Settings file management

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::DashError;
use crate::filesys::file::File;
use crate::logs::LogLevel;

pub const API_URL_ENV: &str = "SHIPDECK_API_URL";
pub const DOMAIN_ENV: &str = "SHIPDECK_DOMAIN";
pub const LOG_LEVEL_ENV: &str = "SHIPDECK_LOG_LEVEL";

/// Dashboard settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,

    /// Emit logs as JSON
    #[serde(default)]
    pub json_logs: bool,

    /// Also write logs to daily files under the logs directory
    #[serde(default)]
    pub file_logging: bool,

    /// Backend configuration
    #[serde(default)]
    pub backend: BackendSettings,

    /// Public domain deployments are served under (`<subdomain>.<domain>`)
    #[serde(default = "default_domain")]
    pub domain: String,

    /// Container stats polling interval in seconds
    #[serde(default = "default_stats_interval")]
    pub stats_interval_secs: u64,

    /// Logs polling interval in seconds
    #[serde(default = "default_logs_interval")]
    pub logs_interval_secs: u64,
}

fn default_domain() -> String {
    "localhost".to_string()
}

fn default_stats_interval() -> u64 {
    10
}

fn default_logs_interval() -> u64 {
    5
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: LogLevel::default(),
            json_logs: false,
            file_logging: false,
            backend: BackendSettings::default(),
            domain: default_domain(),
            stats_interval_secs: default_stats_interval(),
            logs_interval_secs: default_logs_interval(),
        }
    }
}

impl Settings {
    /// Read the settings file, falling back to defaults when it is missing
    pub async fn load(file: &File) -> Result<Self, DashError> {
        if !file.exists().await {
            debug!("No settings file at {}, using defaults", file.path().display());
            return Ok(Self::default());
        }

        file.read_json().await.map_err(|e| {
            DashError::ConfigError(format!(
                "Failed to read settings file {}: {}",
                file.path().display(),
                e
            ))
        })
    }

    /// Apply overrides from the process environment
    pub fn apply_env(&mut self) -> Result<(), DashError> {
        self.apply_overrides(|name| std::env::var(name).ok())
    }

    /// Apply overrides from an arbitrary variable lookup
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), DashError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(API_URL_ENV).filter(|v| !v.is_empty()) {
            self.backend.base_url = url;
        }

        if let Some(domain) = lookup(DOMAIN_ENV).filter(|v| !v.is_empty()) {
            self.domain = domain;
        }

        if let Some(level) = lookup(LOG_LEVEL_ENV).filter(|v| !v.is_empty()) {
            self.log_level = level.parse().map_err(DashError::ConfigError)?;
        }

        Ok(())
    }

    /// Check the settings are usable
    pub fn validate(&self) -> Result<(), DashError> {
        let url = &self.backend.base_url;
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(DashError::ConfigError(format!(
                "Invalid backend URL '{}': must start with http:// or https://",
                url
            )));
        }

        if self.stats_interval_secs == 0 || self.logs_interval_secs == 0 {
            return Err(DashError::ConfigError(
                "Polling intervals must be at least one second".to_string(),
            ));
        }

        Ok(())
    }

    pub fn stats_interval(&self) -> Duration {
        Duration::from_secs(self.stats_interval_secs)
    }

    pub fn logs_interval(&self) -> Duration {
        Duration::from_secs(self.logs_interval_secs)
    }
}

/// Backend API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendSettings {
    /// Base URL for the backend API
    #[serde(default = "default_backend_url")]
    pub base_url: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_backend_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            base_url: default_backend_url(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}
