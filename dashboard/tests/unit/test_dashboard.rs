//! Dashboard page tests: listing and creating deployments

use axum::http::StatusCode;
use openapi_client::models::EnvVar;

use shipdeck::app::options::AppOptions;
use shipdeck::app::state::AppState;
use shipdeck::pages::dashboard::{DashboardPage, DeploymentForm, DEPLOY_FAILED};

use crate::support::{Backend, DEPLOYMENT_ID, TOKEN, USER_ID};

fn form() -> DeploymentForm {
    DeploymentForm {
        clone_url: "https://github.com/acme/api.git".to_string(),
        repo_name: "acme/api".to_string(),
        branch: "develop".to_string(),
        subdomain: "api".to_string(),
        port: 8080,
        envs: vec![EnvVar::new("RUST_LOG", "info")],
        ..Default::default()
    }
}

#[tokio::test]
async fn test_load_lists_deployments() {
    let backend = Backend::start().await;
    let session = backend.logged_in().await;

    let mut page = DashboardPage::new(USER_ID);
    page.load(&backend.client(), &session).await.unwrap();

    assert_eq!(page.deployments().len(), 1);
    assert_eq!(page.deployments()[0].id, DEPLOYMENT_ID);
    assert_eq!(page.deployments()[0].repo_name, "acme/site");
}

#[tokio::test]
async fn test_failed_load_keeps_previous_list() {
    let backend = Backend::start().await;
    let session = backend.logged_in().await;
    let client = backend.client();

    let mut page = DashboardPage::new(USER_ID);
    page.load(&client, &session).await.unwrap();

    backend.stub.fail("list");
    assert!(page.load(&client, &session).await.is_err());
    assert_eq!(page.deployments().len(), 1);
}

#[tokio::test]
async fn test_submit_deploy_refetches_and_resets() {
    let backend = Backend::start().await;
    let session = backend.logged_in().await;

    let mut page = DashboardPage::new(USER_ID);
    page.form = form();

    assert!(page.submit_deploy(&backend.client(), &session).await);
    assert!(page.error().is_none());
    assert!(!page.is_deploying());
    assert!(!page.is_loading());
    assert_eq!(page.form, DeploymentForm::default());

    // the list is refetched, not patched with the create response
    assert_eq!(backend.stub.count("list"), 1);
    assert_eq!(page.deployments().len(), 2);
    let created = page
        .deployments()
        .iter()
        .find(|d| d.sub_domain == "api")
        .unwrap();
    assert_eq!(created.branch, "develop");
    assert_eq!(created.port, 8080);
    assert_eq!(created.env_vars, vec![EnvVar::new("RUST_LOG", "info")]);
}

async fn rejected_deploy(status: StatusCode, body: &str) -> (Backend, DashboardPage) {
    let backend = Backend::start().await;
    let session = backend.logged_in().await;
    backend.stub.reject_deploy(status, body);

    let mut page = DashboardPage::new(USER_ID);
    page.form = form();
    assert!(!page.submit_deploy(&backend.client(), &session).await);
    assert!(!page.is_loading());
    (backend, page)
}

#[tokio::test]
async fn test_submit_deploy_shows_backend_message() {
    let (backend, page) = rejected_deploy(
        StatusCode::BAD_REQUEST,
        r#"{"error": "internal code E12", "message": "subdomain taken"}"#,
    )
    .await;

    assert_eq!(page.error(), Some("subdomain taken"));
    // the form is kept for another attempt
    assert_eq!(page.form, form());
    assert_eq!(backend.stub.deployment_count(), 1);
}

#[tokio::test]
async fn test_submit_deploy_without_message_uses_generic_error() {
    let (_backend, page) =
        rejected_deploy(StatusCode::BAD_REQUEST, r#"{"error": "internal code E12"}"#).await;
    assert_eq!(page.error(), Some(DEPLOY_FAILED));

    let (_backend, page) = rejected_deploy(StatusCode::BAD_REQUEST, r#"{"detail": "x"}"#).await;
    assert_eq!(page.error(), Some(DEPLOY_FAILED));

    let (_backend, page) = rejected_deploy(
        StatusCode::BAD_GATEWAY,
        "<html><body>502 Bad Gateway</body></html>",
    )
    .await;
    assert_eq!(page.error(), Some(DEPLOY_FAILED));
}

#[tokio::test]
async fn test_submit_deploy_validation_sends_nothing() {
    let backend = Backend::start().await;
    let session = backend.logged_in().await;

    let mut page = DashboardPage::new(USER_ID);
    page.form = DeploymentForm {
        clone_url: String::new(),
        ..form()
    };

    assert!(!page.submit_deploy(&backend.client(), &session).await);
    assert_eq!(page.error(), Some("Clone URL is required"));
    assert_eq!(backend.stub.count("deploy"), 0);
}

#[tokio::test]
async fn test_app_state_dashboard_uses_stored_session() {
    let backend = Backend::start().await;
    backend.logged_in().await;

    let options = AppOptions {
        backend_base_url: backend.base_url.clone(),
        ..Default::default()
    };
    let state = AppState::init(backend.layout(), options).unwrap();
    let page = state.dashboard().await.unwrap();

    assert_eq!(page.user_id(), USER_ID);
    assert_eq!(page.deployments().len(), 1);

    let hits = backend.stub.hits();
    assert!(hits
        .iter()
        .all(|hit| hit.authorization.as_deref() == Some(TOKEN)));
}

#[tokio::test]
async fn test_app_state_requires_login() {
    let backend = Backend::start().await;
    let options = AppOptions {
        backend_base_url: backend.base_url.clone(),
        ..Default::default()
    };
    let state = AppState::init(backend.layout(), options).unwrap();

    assert!(state.dashboard().await.is_err());
    assert!(backend.stub.hits().is_empty());
}
