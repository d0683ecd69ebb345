//! Login, registration and session tests

use secrecy::ExposeSecret;

use shipdeck::authn::session_mngr::SessionManagerExt;
use shipdeck::pages::login::{
    home, logout, LoginForm, RegisterForm, LOGIN_FAILED, MISSING_CREDENTIALS, PASSWORD_TOO_SHORT,
    REGISTER_FAILED,
};
use shipdeck::pages::Navigation;
use shipdeck::storage::session::load_session;

use crate::support::{Backend, PASSWORD, TOKEN, USERNAME, USER_ID};

#[tokio::test]
async fn test_login_stores_session_and_navigates() {
    let backend = Backend::start().await;
    let sessions = backend.sessions();

    let mut form = LoginForm::new(USERNAME, PASSWORD);
    let next = form.submit(&backend.client(), &sessions).await;

    assert_eq!(next, Some(Navigation::Dashboard(USER_ID.to_string())));
    assert!(form.error().is_none());
    assert!(!form.is_loading());

    let stored = load_session(&backend.layout().session_file()).await.unwrap();
    assert_eq!(stored.sesid.expose_secret(), TOKEN);
    assert_eq!(stored.userid.as_deref(), Some(USER_ID));

    // login itself is unauthenticated
    let hits = backend.stub.hits();
    assert_eq!(hits.len(), 1);
    assert!(hits[0].authorization.is_none());
}

#[tokio::test]
async fn test_login_with_empty_fields_sends_nothing() {
    let backend = Backend::start().await;
    let sessions = backend.sessions();

    let mut form = LoginForm::new("", PASSWORD);
    assert_eq!(form.submit(&backend.client(), &sessions).await, None);
    assert_eq!(form.error(), Some(MISSING_CREDENTIALS));

    let mut form = LoginForm::new(USERNAME, "");
    assert_eq!(form.submit(&backend.client(), &sessions).await, None);
    assert_eq!(form.error(), Some(MISSING_CREDENTIALS));

    assert_eq!(backend.stub.count("login"), 0);
    assert!(sessions.get_session().await.is_err());
}

#[tokio::test]
async fn test_login_rejected() {
    let backend = Backend::start().await;
    let sessions = backend.sessions();

    let mut form = LoginForm::new(USERNAME, "wrong-password");
    assert_eq!(form.submit(&backend.client(), &sessions).await, None);
    assert_eq!(form.error(), Some(LOGIN_FAILED));
    assert!(!form.is_loading());
    assert!(sessions.get_session().await.is_err());
}

#[tokio::test]
async fn test_register_stores_token_and_sends_to_login() {
    let backend = Backend::start().await;
    let sessions = backend.sessions();

    let mut form = RegisterForm::new("bob", "hunter22");
    let next = form.submit(&backend.client(), &sessions).await;
    assert_eq!(next, Some(Navigation::Login));

    let session = sessions.get_session().await.unwrap();
    assert_eq!(session.token(), "tok-new");
    assert!(session.userid.is_none());

    // without a user id the landing page is still the login form
    assert_eq!(home(&sessions).await, Navigation::Login);
}

#[tokio::test]
async fn test_register_validation_and_rejection() {
    let backend = Backend::start().await;
    let sessions = backend.sessions();

    let mut form = RegisterForm::new("bob", "short");
    assert_eq!(form.submit(&backend.client(), &sessions).await, None);
    assert_eq!(form.error(), Some(PASSWORD_TOO_SHORT));
    assert_eq!(backend.stub.count("register"), 0);

    let mut form = RegisterForm::new(USERNAME, "long-enough");
    assert_eq!(form.submit(&backend.client(), &sessions).await, None);
    assert_eq!(form.error(), Some(REGISTER_FAILED));
    assert_eq!(backend.stub.count("register"), 1);
}

#[tokio::test]
async fn test_home_and_logout() {
    let backend = Backend::start().await;
    let sessions = backend.sessions();

    assert_eq!(home(&sessions).await, Navigation::Login);

    backend.logged_in().await;
    // a fresh manager reads what the previous one persisted
    let sessions = backend.sessions();
    assert_eq!(home(&sessions).await, Navigation::Dashboard(USER_ID.to_string()));

    logout(&sessions).await.unwrap();
    assert_eq!(home(&sessions).await, Navigation::Login);
    assert!(!backend.layout().session_file().exists().await);
}
