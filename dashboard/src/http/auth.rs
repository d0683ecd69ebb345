//! Authentication API client

use openapi_client::models::{CredentialsRequest, LoginResponse, RegisterResponse};

use crate::errors::DashError;
use crate::http::client::HttpClient;

impl HttpClient {
    /// Exchange credentials for a session token and user id
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginResponse, DashError> {
        let body = CredentialsRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        self.post(&["login"], None, &body).await
    }

    /// Create an account
    pub async fn register(
        &self,
        username: &str,
        password: &str,
    ) -> Result<RegisterResponse, DashError> {
        let body = CredentialsRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        self.post(&["register"], None, &body).await
    }
}
