//! Session file management
//!
//! The session token returned by `/login` is kept in `session.json` under the
//! storage layout, readable by the owner only.

use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::DashError;
use crate::filesys::file::File;

/// Session stored locally after login or registration
#[derive(Debug, Serialize, Deserialize)]
pub struct Session {
    /// Opaque session token sent in the `Authorization` header
    #[serde(serialize_with = "expose", deserialize_with = "conceal")]
    pub sesid: SecretString,

    /// User id, known after login (registration only yields a token)
    #[serde(default)]
    pub userid: Option<String>,

    /// When the session was stored
    pub created_at: DateTime<Utc>,
}

impl Session {
    /// Create a new session
    pub fn new(sesid: impl Into<String>, userid: Option<String>) -> Self {
        Self {
            sesid: SecretString::from(sesid.into()),
            userid,
            created_at: Utc::now(),
        }
    }

    /// The raw token
    pub fn token(&self) -> &str {
        self.sesid.expose_secret()
    }
}

impl Clone for Session {
    fn clone(&self) -> Self {
        Self {
            sesid: SecretString::from(self.token().to_string()),
            userid: self.userid.clone(),
            created_at: self.created_at,
        }
    }
}

fn expose<S: Serializer>(secret: &SecretString, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(secret.expose_secret())
}

fn conceal<'de, D: Deserializer<'de>>(deserializer: D) -> Result<SecretString, D::Error> {
    String::deserialize(deserializer).map(SecretString::from)
}

/// Assert that a usable session is stored
pub async fn assert_logged_in(session_file: &File) -> Result<Session, DashError> {
    if !session_file.exists().await {
        return Err(DashError::SessionError(
            "Not logged in, run `shipdeck login` first".to_string(),
        ));
    }

    let session: Session = session_file.read_json().await.map_err(|e| {
        DashError::SessionError(format!("Failed to read session file: {}", e))
    })?;

    if session.token().is_empty() {
        return Err(DashError::SessionError("Session token is empty".to_string()));
    }

    Ok(session)
}

/// Load session from file
pub async fn load_session(session_file: &File) -> Result<Session, DashError> {
    session_file.read_json().await
}

/// Save session to file with owner-only permissions
pub async fn save_session(session_file: &File, session: &Session) -> Result<(), DashError> {
    session_file.write_private_json(session).await
}

/// Remove the stored session
pub async fn clear_session(session_file: &File) -> Result<(), DashError> {
    session_file.delete().await
}
