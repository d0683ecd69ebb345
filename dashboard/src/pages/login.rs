//! Login and registration forms

use secrecy::{ExposeSecret, SecretString};
use tracing::{error, info};

use crate::authn::session_mngr::SessionManagerExt;
use crate::errors::DashError;
use crate::http::client::HttpClient;
use crate::pages::Navigation;
use crate::storage::session::Session;

pub const MISSING_CREDENTIALS: &str = "Username and password are required";
pub const PASSWORD_TOO_SHORT: &str = "Password must be at least 6 characters long";
pub const LOGIN_FAILED: &str = "Failed to login. Please try again.";
pub const REGISTER_FAILED: &str = "Failed to register. Please try again.";

/// Minimum password length accepted by the registration form
pub const MIN_PASSWORD_LEN: usize = 6;

/// Login form state
#[derive(Debug)]
pub struct LoginForm {
    pub username: String,
    pub password: SecretString,
    error: Option<String>,
    is_loading: bool,
}

impl LoginForm {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: SecretString::from(password.into()),
            error: None,
            is_loading: false,
        }
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn validate(&self) -> Result<(), DashError> {
        if self.username.is_empty() || self.password.expose_secret().is_empty() {
            return Err(DashError::ValidationError(MISSING_CREDENTIALS.to_string()));
        }
        Ok(())
    }

    /// Submit the form: on success the session is stored and the user is
    /// sent to their dashboard. Returns `None` and sets the form error
    /// otherwise.
    pub async fn submit<S>(&mut self, client: &HttpClient, sessions: &S) -> Option<Navigation>
    where
        S: SessionManagerExt + ?Sized,
    {
        if let Err(e) = self.validate() {
            self.error = Some(user_message(e));
            return None;
        }

        self.error = None;
        self.is_loading = true;
        let result = self.login(client, sessions).await;
        self.is_loading = false;

        match result {
            Ok(user_id) => {
                info!("Logged in as user {}", user_id);
                Some(Navigation::Dashboard(user_id))
            }
            Err(e) => {
                error!("Login failed: {}", e);
                self.error = Some(LOGIN_FAILED.to_string());
                None
            }
        }
    }

    async fn login<S>(&self, client: &HttpClient, sessions: &S) -> Result<String, DashError>
    where
        S: SessionManagerExt + ?Sized,
    {
        let response = client
            .login(&self.username, self.password.expose_secret())
            .await?;
        sessions
            .store(Session::new(response.sesid, Some(response.userid.clone())))
            .await?;
        Ok(response.userid)
    }
}

/// Registration form state
#[derive(Debug)]
pub struct RegisterForm {
    pub username: String,
    pub password: SecretString,
    error: Option<String>,
    is_loading: bool,
}

impl RegisterForm {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: SecretString::from(password.into()),
            error: None,
            is_loading: false,
        }
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn validate(&self) -> Result<(), DashError> {
        let password = self.password.expose_secret();
        if self.username.is_empty() || password.is_empty() {
            return Err(DashError::ValidationError(MISSING_CREDENTIALS.to_string()));
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(DashError::ValidationError(PASSWORD_TOO_SHORT.to_string()));
        }
        Ok(())
    }

    /// Submit the form: on success the issued token is stored and the user is
    /// sent to the login page.
    pub async fn submit<S>(&mut self, client: &HttpClient, sessions: &S) -> Option<Navigation>
    where
        S: SessionManagerExt + ?Sized,
    {
        if let Err(e) = self.validate() {
            self.error = Some(user_message(e));
            return None;
        }

        self.error = None;
        self.is_loading = true;
        let result = self.register(client, sessions).await;
        self.is_loading = false;

        match result {
            Ok(()) => {
                info!("Registered user {}", self.username);
                Some(Navigation::Login)
            }
            Err(e) => {
                error!("Registration failed: {}", e);
                self.error = Some(REGISTER_FAILED.to_string());
                None
            }
        }
    }

    async fn register<S>(&self, client: &HttpClient, sessions: &S) -> Result<(), DashError>
    where
        S: SessionManagerExt + ?Sized,
    {
        let response = client
            .register(&self.username, self.password.expose_secret())
            .await?;
        sessions.store(Session::new(response.sesid, None)).await
    }
}

/// Landing decision: the dashboard when a logged-in user is known, else login
pub async fn home<S>(sessions: &S) -> Navigation
where
    S: SessionManagerExt + ?Sized,
{
    match sessions.get_user_id().await {
        Ok(user_id) => Navigation::Dashboard(user_id),
        Err(_) => Navigation::Login,
    }
}

/// Forget the stored session
pub async fn logout<S>(sessions: &S) -> Result<(), DashError>
where
    S: SessionManagerExt + ?Sized,
{
    sessions.clear().await
}

fn user_message(e: DashError) -> String {
    match e {
        DashError::ValidationError(message) => message,
        other => other.to_string(),
    }
}
