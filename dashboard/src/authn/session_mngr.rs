//! Session manager for user authentication

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::errors::DashError;
use crate::filesys::file::File;
use crate::storage::session::{assert_logged_in, clear_session, save_session, Session};

/// Session manager trait for testability
#[async_trait]
pub trait SessionManagerExt: Send + Sync {
    /// Get the current session
    async fn get_session(&self) -> Result<Session, DashError>;

    /// Persist a freshly issued session
    async fn store(&self, session: Session) -> Result<(), DashError>;

    /// Forget the current session
    async fn clear(&self) -> Result<(), DashError>;

    /// Get the logged-in user id
    async fn get_user_id(&self) -> Result<String, DashError> {
        self.get_session().await?.userid.ok_or_else(|| {
            DashError::SessionError("Session has no user id, log in again".to_string())
        })
    }
}

/// File-backed session manager with an in-memory cache
pub struct SessionManager {
    session_file: File,
    cached_session: RwLock<Option<Session>>,
}

impl SessionManager {
    /// Create a new session manager
    pub fn new(session_file: File) -> Self {
        Self {
            session_file,
            cached_session: RwLock::new(None),
        }
    }

    /// Load session from the session file
    async fn load_session(&self) -> Result<Session, DashError> {
        let session = assert_logged_in(&self.session_file).await?;

        let mut cached = self.cached_session.write().await;
        *cached = Some(session.clone());

        Ok(session)
    }
}

#[async_trait]
impl SessionManagerExt for SessionManager {
    async fn get_session(&self) -> Result<Session, DashError> {
        {
            let cached = self.cached_session.read().await;
            if let Some(session) = cached.as_ref() {
                return Ok(session.clone());
            }
        }

        self.load_session().await
    }

    async fn store(&self, session: Session) -> Result<(), DashError> {
        save_session(&self.session_file, &session).await?;
        debug!("Session saved to {}", self.session_file.path().display());

        let mut cached = self.cached_session.write().await;
        *cached = Some(session);

        Ok(())
    }

    async fn clear(&self) -> Result<(), DashError> {
        clear_session(&self.session_file).await?;

        let mut cached = self.cached_session.write().await;
        *cached = None;

        info!("Session cleared");
        Ok(())
    }
}
