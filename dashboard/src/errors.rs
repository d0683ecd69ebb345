//! Error types for the shipdeck dashboard

use openapi_client::models::ErrorBody;
use reqwest::StatusCode;
use thiserror::Error;

/// Main error type for the dashboard
#[derive(Error, Debug)]
pub enum DashError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// The backend answered with a non-success status
    #[error("API error ({status}): {}", .body.summary().unwrap_or("no details"))]
    ApiError { status: StatusCode, body: ErrorBody },

    #[error("Session error: {0}")]
    SessionError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl DashError {
    /// The `message` field of a backend rejection, for display to the user
    pub fn api_message(&self) -> Option<&str> {
        match self {
            DashError::ApiError { body, .. } => body.message(),
            _ => None,
        }
    }
}

impl From<url::ParseError> for DashError {
    fn from(err: url::ParseError) -> Self {
        DashError::ConfigError(format!("invalid URL: {}", err))
    }
}
