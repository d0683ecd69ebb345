//! User dashboard: deployment list and deployment creation form

use openapi_client::models::{CreateDeploymentRequest, Deployment, EnvVar};
use tracing::{error, info, warn};

use crate::errors::DashError;
use crate::http::client::HttpClient;
use crate::storage::session::Session;

pub const EMPTY_ENV_KEY: &str = "Environment variable key cannot be empty";
pub const DEPLOY_FAILED: &str = "Deployment failed";

/// New deployment form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeploymentForm {
    pub clone_url: String,
    pub repo_name: String,
    pub branch: String,
    pub subdomain: String,
    pub port: u16,
    pub envs: Vec<EnvVar>,
    pub new_env_key: String,
    pub new_env_value: String,
}

impl DeploymentForm {
    /// Move the pending key/value inputs into the env list
    pub fn add_env(&mut self) -> Result<(), DashError> {
        if self.new_env_key.trim().is_empty() {
            return Err(DashError::ValidationError(EMPTY_ENV_KEY.to_string()));
        }

        let key = std::mem::take(&mut self.new_env_key);
        let value = std::mem::take(&mut self.new_env_value);
        self.envs.push(EnvVar::new(key, value));
        Ok(())
    }

    /// Remove the env var at `index`, ignoring out of range positions
    pub fn remove_env(&mut self, index: usize) {
        if index < self.envs.len() {
            self.envs.remove(index);
        }
    }

    /// Presence checks before submission
    pub fn validate(&self) -> Result<(), DashError> {
        let required = [
            ("Clone URL", &self.clone_url),
            ("Repository name", &self.repo_name),
            ("Branch", &self.branch),
            ("Subdomain", &self.subdomain),
        ];

        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(DashError::ValidationError(format!("{} is required", field)));
            }
        }

        if self.port == 0 {
            return Err(DashError::ValidationError("Port is required".to_string()));
        }

        Ok(())
    }

    pub fn to_request(&self) -> CreateDeploymentRequest {
        CreateDeploymentRequest {
            clone_url: self.clone_url.clone(),
            repo_name: self.repo_name.clone(),
            branch: self.branch.clone(),
            subdomain: self.subdomain.clone(),
            port: self.port,
            envs: self.envs.clone(),
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Dashboard page state
#[derive(Debug)]
pub struct DashboardPage {
    user_id: String,
    deployments: Vec<Deployment>,
    pub form: DeploymentForm,
    error: Option<String>,
    is_loading: bool,
    deploying: bool,
}

impl DashboardPage {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            deployments: Vec::new(),
            form: DeploymentForm::default(),
            error: None,
            is_loading: false,
            deploying: false,
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn deployments(&self) -> &[Deployment] {
        &self.deployments
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// True while a submission is in flight, including the list refresh
    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// True while the backend is handling the deploy request
    pub fn is_deploying(&self) -> bool {
        self.deploying
    }

    /// Fetch the user's deployments. On failure the previous list stays.
    pub async fn load(&mut self, client: &HttpClient, session: &Session) -> Result<(), DashError> {
        match client.list_deployments(&self.user_id, session.token()).await {
            Ok(deployments) => {
                info!("Loaded {} deployments", deployments.len());
                self.deployments = deployments;
                Ok(())
            }
            Err(e) => {
                warn!("Failed to load deployments for {}: {}", self.user_id, e);
                Err(e)
            }
        }
    }

    /// Add the pending env var of the form, surfacing validation errors
    pub fn add_env(&mut self) {
        match self.form.add_env() {
            Ok(()) => self.error = None,
            Err(e) => self.error = Some(validation_message(e)),
        }
    }

    /// Submit the deployment form. Returns whether the backend accepted it.
    pub async fn submit_deploy(&mut self, client: &HttpClient, session: &Session) -> bool {
        if let Err(e) = self.form.validate() {
            self.error = Some(validation_message(e));
            return false;
        }

        self.error = None;
        self.is_loading = true;
        self.deploying = true;

        let request = self.form.to_request();
        let result = client.create_deployment(session.token(), &request).await;
        self.deploying = false;

        let accepted = match result {
            Ok(()) => {
                info!(
                    "Deployment of {} submitted as {}",
                    request.repo_name, request.subdomain
                );
                // A failed refresh keeps the stale list; the deployment itself went through
                let _ = self.load(client, session).await;
                self.form.reset();
                true
            }
            Err(e) => {
                error!("Deployment failed: {}", e);
                self.error = Some(
                    e.api_message()
                        .map(str::to_string)
                        .unwrap_or_else(|| DEPLOY_FAILED.to_string()),
                );
                false
            }
        };

        self.is_loading = false;
        accepted
    }
}

fn validation_message(e: DashError) -> String {
    match e {
        DashError::ValidationError(message) => message,
        other => other.to_string(),
    }
}
