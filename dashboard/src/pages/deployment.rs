//! Deployment detail page: live stats, logs panel, restart and env editing

use std::sync::Arc;
use std::time::Duration;

use futures::future::{BoxFuture, FutureExt};
use openapi_client::models::{ContainerStats, Deployment, EnvVar};
use tokio::sync::{Notify, RwLock};
use tracing::{error, info, warn};

use crate::errors::DashError;
use crate::http::client::HttpClient;
use crate::http::env::check_path_key;
use crate::pages::env::{EnvChange, EnvList};
use crate::storage::session::Session;
use crate::workers::poller::{self, Poller};

pub const FETCH_FAILED: &str = "Failed to fetch deployment";
pub const RESTART_OK: &str = "Deployment restarted successfully";
pub const RESTART_FAILED: &str = "Failed to restart deployment";
pub const ENV_KEY_REQUIRED: &str = "Environment variable key is required";
pub const ENV_VALUE_EMPTY: &str = "Environment variable value cannot be empty";
pub const ENV_ADD_FAILED: &str = "Failed to add environment variable";
pub const ENV_UPDATE_FAILED: &str = "Failed to update environment variable";
pub const ENV_DELETE_FAILED: &str = "Failed to delete environment variable";

/// Polling cadence of the page
#[derive(Debug, Clone)]
pub struct PageOptions {
    pub stats_interval: Duration,
    pub logs_interval: Duration,
}

impl Default for PageOptions {
    fn default() -> Self {
        Self {
            stats_interval: Duration::from_secs(10),
            logs_interval: Duration::from_secs(5),
        }
    }
}

/// Data refreshed in the background by the pollers
struct LiveFeed {
    client: HttpClient,
    session: Session,
    deployment_id: String,
    stats: RwLock<Option<ContainerStats>>,
    logs: RwLock<Vec<String>>,
    updates: Arc<Notify>,
}

impl LiveFeed {
    async fn poll_stats(&self) -> Result<(), DashError> {
        let stats = self
            .client
            .get_stats(&self.deployment_id, self.session.token())
            .await?;
        *self.stats.write().await = Some(stats);
        self.updates.notify_one();
        Ok(())
    }

    async fn poll_logs(&self) -> Result<(), DashError> {
        let logs = self
            .client
            .get_logs(&self.deployment_id, self.session.token())
            .await?;
        *self.logs.write().await = logs;
        self.updates.notify_one();
        Ok(())
    }
}

/// Point-in-time copy of everything the page displays
#[derive(Debug, Clone, Default)]
pub struct DeploymentView {
    pub deployment: Option<Deployment>,
    pub env: Vec<EnvVar>,
    pub stats: Option<ContainerStats>,
    pub logs: Option<Vec<String>>,
    pub error: Option<String>,
    pub env_error: Option<String>,
    pub redeploying: bool,
}

/// Deployment detail page state
pub struct DeploymentPage {
    feed: Arc<LiveFeed>,
    options: PageOptions,
    deployment: Option<Deployment>,
    env: EnvList,
    show_logs: bool,
    error: Option<String>,
    env_error: Option<String>,
    redeploying: bool,
    stats_poller: Option<Poller>,
    logs_poller: Option<Poller>,
}

impl DeploymentPage {
    /// Open the page and fetch the deployment. A failed fetch leaves the page
    /// in its error state.
    pub async fn open(
        client: HttpClient,
        session: Session,
        deployment_id: impl Into<String>,
        options: PageOptions,
    ) -> Self {
        let feed = Arc::new(LiveFeed {
            client,
            session,
            deployment_id: deployment_id.into(),
            stats: RwLock::new(None),
            logs: RwLock::new(Vec::new()),
            updates: Arc::new(Notify::new()),
        });

        let mut page = Self {
            feed,
            options,
            deployment: None,
            env: EnvList::default(),
            show_logs: false,
            error: None,
            env_error: None,
            redeploying: false,
            stats_poller: None,
            logs_poller: None,
        };

        if let Err(e) = page.fetch_deployment().await {
            error!("Failed to load deployment {}: {}", page.deployment_id(), e);
            page.error = Some(FETCH_FAILED.to_string());
        }

        page
    }

    pub fn deployment_id(&self) -> &str {
        &self.feed.deployment_id
    }

    pub fn deployment(&self) -> Option<&Deployment> {
        self.deployment.as_ref()
    }

    pub fn env(&self) -> &EnvList {
        &self.env
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn env_error(&self) -> Option<&str> {
        self.env_error.as_deref()
    }

    pub fn show_logs(&self) -> bool {
        self.show_logs
    }

    pub fn is_redeploying(&self) -> bool {
        self.redeploying
    }

    pub fn is_polling_stats(&self) -> bool {
        self.stats_poller.is_some()
    }

    pub fn is_polling_logs(&self) -> bool {
        self.logs_poller.is_some()
    }

    pub async fn stats(&self) -> Option<ContainerStats> {
        self.feed.stats.read().await.clone()
    }

    pub async fn logs(&self) -> Vec<String> {
        self.feed.logs.read().await.clone()
    }

    /// Notified whenever a poller stores fresh data
    pub fn updates(&self) -> Arc<Notify> {
        self.feed.updates.clone()
    }

    /// `http://<subdomain>.<domain>` of the deployed site
    pub fn site_url(&self, domain: &str) -> Option<String> {
        self.deployment
            .as_ref()
            .map(|d| format!("http://{}.{}", d.sub_domain, domain))
    }

    pub async fn view(&self) -> DeploymentView {
        DeploymentView {
            deployment: self.deployment.clone(),
            env: self.env.as_slice().to_vec(),
            stats: self.stats().await,
            logs: if self.show_logs {
                Some(self.logs().await)
            } else {
                None
            },
            error: self.error.clone(),
            env_error: self.env_error.clone(),
            redeploying: self.redeploying,
        }
    }

    async fn fetch_deployment(&mut self) -> Result<(), DashError> {
        let deployment = self
            .feed
            .client
            .get_deployment(&self.feed.deployment_id, self.feed.session.token())
            .await?;
        self.env.replace(deployment.env_vars.clone());
        self.deployment = Some(deployment);
        self.error = None;
        Ok(())
    }

    /// Fetch stats once. On failure the previous stats stay displayed.
    pub async fn refresh_stats(&self) -> Result<(), DashError> {
        self.feed.poll_stats().await.inspect_err(|e| {
            warn!("Error fetching container stats: {}", e);
        })
    }

    /// Fetch logs once. On failure the previous logs stay displayed.
    pub async fn refresh_logs(&self) -> Result<(), DashError> {
        self.feed.poll_logs().await.inspect_err(|e| {
            warn!("Error fetching logs: {}", e);
        })
    }

    /// Poll stats now and then on every stats interval
    pub fn start_stats_polling(&mut self) {
        if self.stats_poller.is_some() {
            return;
        }

        let feed = self.feed.clone();
        let tick = move || -> BoxFuture<'static, Result<(), DashError>> {
            let feed = feed.clone();
            async move { feed.poll_stats().await }.boxed()
        };

        self.stats_poller = Some(Poller::spawn(
            "stats",
            poller::Options::every(self.options.stats_interval),
            tick,
        ));
    }

    /// Open or close the logs panel
    pub async fn toggle_logs(&mut self) {
        let visible = !self.show_logs;
        self.set_logs_visible(visible).await;
    }

    /// Opening fetches logs now and on every logs interval; closing stops
    /// fetching entirely.
    pub async fn set_logs_visible(&mut self, visible: bool) {
        self.show_logs = visible;

        if !visible {
            if let Some(poller) = self.logs_poller.take() {
                poller.stop().await;
            }
            return;
        }

        if self.logs_poller.is_some() {
            return;
        }

        let feed = self.feed.clone();
        let tick = move || -> BoxFuture<'static, Result<(), DashError>> {
            let feed = feed.clone();
            async move { feed.poll_logs().await }.boxed()
        };

        self.logs_poller = Some(Poller::spawn(
            "logs",
            poller::Options::every(self.options.logs_interval),
            tick,
        ));
    }

    /// Rebuild and restart the deployment, then refresh what the page shows.
    /// The `Err` carries the message to show the user.
    pub async fn restart(&mut self) -> Result<(), String> {
        self.redeploying = true;
        let result = self
            .feed
            .client
            .redeploy(&self.feed.deployment_id, self.feed.session.token())
            .await;

        let outcome = match result {
            Ok(()) => {
                info!("Deployment {} restarted", self.deployment_id());
                let _ = self.refresh_stats().await;
                if let Err(e) = self.fetch_deployment().await {
                    warn!("Failed to reload deployment after restart: {}", e);
                }
                Ok(())
            }
            Err(e) => {
                error!("Failed to restart deployment {}: {}", self.deployment_id(), e);
                Err(RESTART_FAILED.to_string())
            }
        };

        self.redeploying = false;
        outcome
    }

    /// Add one env var. The list shows it immediately and drops it again if
    /// the backend rejects the change.
    pub async fn add_env(&mut self, key: &str, value: &str) -> bool {
        if key.trim().is_empty() {
            self.env_error = Some(ENV_KEY_REQUIRED.to_string());
            return false;
        }

        let var = EnvVar::new(key, value);
        let pending = self.env.apply(EnvChange::Add(var.clone()));

        let result = self
            .feed
            .client
            .add_env_vars(&self.feed.deployment_id, self.feed.session.token(), vec![var])
            .await;

        match result {
            Ok(()) => {
                self.env_error = None;
                self.resync().await;
                true
            }
            Err(e) => {
                warn!("Rolling back {:?}: {}", pending.change(), e);
                self.env.rollback(pending);
                self.env_error = Some(ENV_ADD_FAILED.to_string());
                false
            }
        }
    }

    /// Change the value of one env var, optimistically
    pub async fn update_env(&mut self, key: &str, value: &str) -> bool {
        if !value.is_empty() && value.trim().is_empty() {
            self.env_error = Some(ENV_VALUE_EMPTY.to_string());
            return false;
        }
        if !self.accepts_path_key(key) {
            return false;
        }

        let pending = self.env.apply(EnvChange::Update {
            key: key.to_string(),
            value: value.to_string(),
        });

        let result = self
            .feed
            .client
            .update_env_var(&self.feed.deployment_id, self.feed.session.token(), key, value)
            .await;

        match result {
            Ok(()) => {
                self.env_error = None;
                self.resync().await;
                true
            }
            Err(e) => {
                warn!("Rolling back {:?}: {}", pending.change(), e);
                self.env.rollback(pending);
                self.env_error = Some(ENV_UPDATE_FAILED.to_string());
                false
            }
        }
    }

    /// Remove one env var, optimistically
    pub async fn delete_env(&mut self, key: &str) -> bool {
        if !self.accepts_path_key(key) {
            return false;
        }

        let pending = self.env.apply(EnvChange::Delete {
            key: key.to_string(),
        });

        let result = self
            .feed
            .client
            .delete_env_var(&self.feed.deployment_id, self.feed.session.token(), key)
            .await;

        match result {
            Ok(()) => {
                self.env_error = None;
                self.resync().await;
                true
            }
            Err(e) => {
                warn!("Rolling back {:?}: {}", pending.change(), e);
                self.env.rollback(pending);
                self.env_error = Some(ENV_DELETE_FAILED.to_string());
                false
            }
        }
    }

    fn accepts_path_key(&mut self, key: &str) -> bool {
        match check_path_key(key) {
            Ok(()) => true,
            Err(DashError::ValidationError(message)) => {
                self.env_error = Some(message);
                false
            }
            Err(e) => {
                self.env_error = Some(e.to_string());
                false
            }
        }
    }

    /// Pull the backend's copy after a confirmed change; the optimistic list
    /// stays if that fails
    async fn resync(&mut self) {
        if let Err(e) = self.fetch_deployment().await {
            warn!("Failed to reload deployment {}: {}", self.deployment_id(), e);
        }
    }

    /// Stop every poller; stats and logs are discarded with the page
    pub async fn close(mut self) {
        if let Some(poller) = self.stats_poller.take() {
            poller.stop().await;
        }
        if let Some(poller) = self.logs_poller.take() {
            poller.stop().await;
        }
    }
}
