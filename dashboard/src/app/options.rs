//! Application configuration options

use std::time::Duration;

use crate::pages::deployment::PageOptions;
use crate::storage::settings::Settings;

/// Main application options
#[derive(Debug, Clone)]
pub struct AppOptions {
    /// Backend API base URL
    pub backend_base_url: String,

    /// Per-request timeout
    pub request_timeout: Duration,

    /// Domain deployed sites are served under
    pub domain: String,

    /// Deployment page polling cadence
    pub page: PageOptions,
}

impl Default for AppOptions {
    fn default() -> Self {
        Self::from(&Settings::default())
    }
}

impl From<&Settings> for AppOptions {
    fn from(settings: &Settings) -> Self {
        Self {
            backend_base_url: settings.backend.base_url.clone(),
            request_timeout: Duration::from_secs(settings.backend.request_timeout_secs),
            domain: settings.domain.clone(),
            page: PageOptions {
                stats_interval: settings.stats_interval(),
                logs_interval: settings.logs_interval(),
            },
        }
    }
}
