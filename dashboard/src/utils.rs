//! Utility functions

use serde::{Deserialize, Serialize};

/// Version information for the dashboard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionInfo {
    pub version: String,
    pub git_hash: String,
    pub build_time: String,
}

/// Get version information
pub fn version_info() -> VersionInfo {
    VersionInfo {
        version: env!("CARGO_PKG_VERSION").to_string(),
        git_hash: option_env!("GIT_HASH").unwrap_or("unknown").to_string(),
        build_time: option_env!("BUILD_TIME").unwrap_or("unknown").to_string(),
    }
}

const MIB: f64 = 1024.0 * 1024.0;

/// Format a byte count as megabytes with two decimals
pub fn format_mb(bytes: u64) -> String {
    format!("{:.2} MB", bytes as f64 / MIB)
}

/// Format a CPU percentage with two decimals
pub fn format_percent(value: f64) -> String {
    format!("{:.2}%", value)
}

/// Parse a `KEY=VALUE` pair; the value may be empty or contain `=`
pub fn parse_env_pair(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => Ok((key.to_string(), value.to_string())),
        Some(_) => Err(format!("missing key in '{}'", raw)),
        None => Err(format!("expected KEY=VALUE, got '{}'", raw)),
    }
}
