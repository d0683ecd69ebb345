//! HTTP client implementation

use std::time::Duration;

use openapi_client::models::ErrorBody;
use reqwest::{header, Client, Method, Response};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};
use url::Url;

use crate::errors::DashError;

/// HTTP client for backend communication
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    base_url: Url,
}

impl HttpClient {
    /// Create a new HTTP client
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, DashError> {
        let base_url = Url::parse(base_url.trim_end_matches('/'))?;
        if base_url.cannot_be_a_base() {
            return Err(DashError::ConfigError(format!(
                "Backend URL '{}' cannot be used as a base",
                base_url
            )));
        }

        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self { client, base_url })
    }

    /// Build an endpoint URL, percent-encoding every segment
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url, DashError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| DashError::ConfigError("Backend URL cannot be a base".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Make a GET request
    pub async fn get<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        token: Option<&str>,
    ) -> Result<T, DashError> {
        let response = self.send(Method::GET, segments, token, None).await?;
        Ok(response.json().await?)
    }

    /// Make a POST request and decode the response
    pub async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        segments: &[&str],
        token: Option<&str>,
        body: &B,
    ) -> Result<T, DashError> {
        let body = serde_json::to_value(body)?;
        let response = self.send(Method::POST, segments, token, Some(body)).await?;
        Ok(response.json().await?)
    }

    /// Make a POST request whose response body is not needed
    pub async fn post_unit<B: Serialize>(
        &self,
        segments: &[&str],
        token: Option<&str>,
        body: &B,
    ) -> Result<(), DashError> {
        let body = serde_json::to_value(body)?;
        self.send(Method::POST, segments, token, Some(body)).await?;
        Ok(())
    }

    /// Make a PUT request whose response body is not needed
    pub async fn put_unit<B: Serialize>(
        &self,
        segments: &[&str],
        token: Option<&str>,
        body: Option<&B>,
    ) -> Result<(), DashError> {
        let body = body.map(serde_json::to_value).transpose()?;
        self.send(Method::PUT, segments, token, body).await?;
        Ok(())
    }

    /// Make a DELETE request
    pub async fn delete(&self, segments: &[&str], token: Option<&str>) -> Result<(), DashError> {
        self.send(Method::DELETE, segments, token, None).await?;
        Ok(())
    }

    async fn send(
        &self,
        method: Method,
        segments: &[&str],
        token: Option<&str>,
        body: Option<serde_json::Value>,
    ) -> Result<Response, DashError> {
        let url = self.endpoint(segments)?;
        debug!("{} {}", method, url);

        let mut request = self.client.request(method.clone(), url.clone());

        // The backend expects the bare session token, not a bearer scheme
        if let Some(token) = token {
            request = request.header(header::AUTHORIZATION, token);
        }

        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        // The raw body only goes to the log; it may be an HTML proxy page
        let raw = response.text().await.unwrap_or_default();
        warn!("HTTP {} {} failed: {} - {}", method, url, status, raw);

        let body = serde_json::from_str::<ErrorBody>(&raw).unwrap_or_default();
        Err(DashError::ApiError { status, body })
    }
}
