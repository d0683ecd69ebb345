//! Environment variable API client

use openapi_client::models::{AddEnvRequest, EnvVar, UpdateEnvRequest};

use crate::errors::DashError;
use crate::http::client::HttpClient;

/// Check a key can travel as one path segment of `/env/{id}/{key}`
pub fn check_path_key(key: &str) -> Result<(), DashError> {
    match key {
        "" | "." | ".." => Err(DashError::ValidationError(format!(
            "'{}' cannot be used as an environment variable key",
            key
        ))),
        _ => Ok(()),
    }
}

impl HttpClient {
    /// Add environment variables to a deployment
    pub async fn add_env_vars(
        &self,
        deployment_id: &str,
        token: &str,
        envs: Vec<EnvVar>,
    ) -> Result<(), DashError> {
        let body = AddEnvRequest {
            envs: envs.into_iter().map(Into::into).collect(),
        };
        self.post_unit(&["env", deployment_id], Some(token), &body).await
    }

    /// Change the value of one environment variable
    pub async fn update_env_var(
        &self,
        deployment_id: &str,
        token: &str,
        key: &str,
        value: &str,
    ) -> Result<(), DashError> {
        check_path_key(key)?;
        let body = UpdateEnvRequest {
            value: value.to_string(),
        };
        self.put_unit(&["env", deployment_id, key], Some(token), Some(&body))
            .await
    }

    /// Remove one environment variable
    pub async fn delete_env_var(
        &self,
        deployment_id: &str,
        token: &str,
        key: &str,
    ) -> Result<(), DashError> {
        check_path_key(key)?;
        self.delete(&["env", deployment_id, key], Some(token)).await
    }
}
