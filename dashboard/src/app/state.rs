//! Application state management

use std::sync::Arc;

use tracing::debug;

use crate::app::options::AppOptions;
use crate::authn::session_mngr::{SessionManager, SessionManagerExt};
use crate::errors::DashError;
use crate::http::client::HttpClient;
use crate::pages::dashboard::DashboardPage;
use crate::pages::deployment::DeploymentPage;
use crate::storage::layout::StorageLayout;

/// Everything a command needs to talk to the backend
pub struct AppState {
    /// Where the session and settings live
    pub layout: StorageLayout,

    /// HTTP client for backend communication
    pub http_client: HttpClient,

    /// Stored login session
    pub sessions: Arc<SessionManager>,

    pub options: AppOptions,
}

impl AppState {
    /// Build the client and session manager for the given layout
    pub fn init(layout: StorageLayout, options: AppOptions) -> Result<Self, DashError> {
        debug!(
            "Initializing app state: base_dir={}, backend={}",
            layout.base_dir.display(),
            options.backend_base_url
        );

        let http_client = HttpClient::new(&options.backend_base_url, options.request_timeout)?;
        let sessions = Arc::new(SessionManager::new(layout.session_file()));

        Ok(Self {
            layout,
            http_client,
            sessions,
            options,
        })
    }

    /// Load the dashboard of the logged-in user
    pub async fn dashboard(&self) -> Result<DashboardPage, DashError> {
        let session = self.sessions.get_session().await?;
        let user_id = self.sessions.get_user_id().await?;

        let mut page = DashboardPage::new(user_id);
        page.load(&self.http_client, &session).await?;
        Ok(page)
    }

    /// Open the detail page of one deployment
    pub async fn deployment(&self, id: &str) -> Result<DeploymentPage, DashError> {
        let session = self.sessions.get_session().await?;
        Ok(DeploymentPage::open(
            self.http_client.clone(),
            session,
            id,
            self.options.page.clone(),
        )
        .await)
    }
}
