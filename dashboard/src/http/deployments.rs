//! Deployment API client

use openapi_client::models::{
    ContainerStats, CreateDeploymentRequest, Deployment, DeploymentListResponse,
    DeploymentResponse, LogsResponse, StatsResponse,
};

use crate::errors::DashError;
use crate::http::client::HttpClient;

impl HttpClient {
    /// List the deployments owned by a user
    pub async fn list_deployments(
        &self,
        user_id: &str,
        token: &str,
    ) -> Result<Vec<Deployment>, DashError> {
        let response: DeploymentListResponse =
            self.get(&["deployments", user_id], Some(token)).await?;
        Ok(response.deployments)
    }

    /// Trigger a new deployment
    pub async fn create_deployment(
        &self,
        token: &str,
        request: &CreateDeploymentRequest,
    ) -> Result<(), DashError> {
        self.post_unit(&["deploy"], Some(token), request).await
    }

    /// Fetch one deployment
    pub async fn get_deployment(
        &self,
        deployment_id: &str,
        token: &str,
    ) -> Result<Deployment, DashError> {
        let response: DeploymentResponse =
            self.get(&["deployment", deployment_id], Some(token)).await?;
        Ok(response.deployment)
    }

    /// Fetch the current container stats of a deployment
    pub async fn get_stats(
        &self,
        deployment_id: &str,
        token: &str,
    ) -> Result<ContainerStats, DashError> {
        let response: StatsResponse = self
            .get(&["deployment", deployment_id, "stats"], Some(token))
            .await?;
        Ok(response.stats)
    }

    /// Fetch the recent container logs of a deployment
    pub async fn get_logs(&self, deployment_id: &str, token: &str) -> Result<Vec<String>, DashError> {
        let response: LogsResponse = self
            .get(&["deployment", deployment_id, "logs"], Some(token))
            .await?;
        Ok(response.logs)
    }

    /// Rebuild and restart a deployment
    pub async fn redeploy(&self, deployment_id: &str, token: &str) -> Result<(), DashError> {
        self.put_unit::<()>(&["redeploy", deployment_id], Some(token), None)
            .await
    }
}
