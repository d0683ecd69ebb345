//! Deployment page tests: polling, restart and env editing

use std::time::Duration;

use openapi_client::models::EnvVar;

use shipdeck::pages::deployment::{
    DeploymentPage, PageOptions, ENV_ADD_FAILED, ENV_DELETE_FAILED, ENV_KEY_REQUIRED,
    ENV_UPDATE_FAILED, ENV_VALUE_EMPTY, FETCH_FAILED, RESTART_FAILED,
};

use crate::support::{wait_for, within, Backend, DEPLOYMENT_ID, TOKEN};

fn fast() -> PageOptions {
    PageOptions {
        stats_interval: Duration::from_millis(40),
        logs_interval: Duration::from_millis(40),
    }
}

async fn open(backend: &Backend) -> DeploymentPage {
    let session = backend.logged_in().await;
    DeploymentPage::open(backend.client(), session, DEPLOYMENT_ID, fast()).await
}

#[tokio::test]
async fn test_open_loads_deployment() {
    let backend = Backend::start().await;
    let page = open(&backend).await;

    assert!(page.error().is_none());
    let deployment = page.deployment().unwrap();
    assert_eq!(deployment.repo_name, "acme/site");
    assert_eq!(page.env().as_slice(), &[EnvVar::new("NODE_ENV", "production")]);
    assert_eq!(
        page.site_url("apps.example.com").as_deref(),
        Some("http://site.apps.example.com")
    );

    // nothing is polled until asked
    assert!(!page.is_polling_stats());
    assert!(!page.is_polling_logs());
    assert_eq!(backend.stub.count("stats"), 0);
    page.close().await;
}

#[tokio::test]
async fn test_open_unknown_deployment() {
    let backend = Backend::start().await;
    let session = backend.logged_in().await;
    let page = DeploymentPage::open(backend.client(), session, "missing", fast()).await;

    assert_eq!(page.error(), Some(FETCH_FAILED));
    assert!(page.deployment().is_none());
    assert!(page.view().await.error.is_some());
    page.close().await;
}

#[tokio::test]
async fn test_every_request_carries_token() {
    let backend = Backend::start().await;
    let mut page = open(&backend).await;

    page.refresh_stats().await.unwrap();
    page.refresh_logs().await.unwrap();
    assert!(page.restart().await.is_ok());
    assert!(page.add_env("A", "1").await);
    assert!(page.update_env("A", "2").await);
    assert!(page.delete_env("A").await);
    page.close().await;

    let hits = backend.stub.hits();
    assert!(hits.len() >= 7);
    for hit in hits {
        assert_eq!(hit.authorization.as_deref(), Some(TOKEN), "{}", hit.route);
    }
}

#[tokio::test]
async fn test_stats_polling_and_failure_keeps_previous() {
    let backend = Backend::start().await;
    let stub = backend.stub.clone();
    let mut page = open(&backend).await;
    let updates = page.updates();

    page.start_stats_polling();
    assert!(page.is_polling_stats());
    within(updates.notified()).await;
    wait_for("a second stats poll", || stub.count("stats") >= 2).await;

    stub.fail("stats");
    let before = stub.count("stats");
    // polls are sequential, so once a failing one is seen the last success is stored
    wait_for("a failing stats poll", || stub.count("stats") > before).await;
    let stats = page.stats().await.unwrap();
    assert!(stats.is_running());
    assert_eq!(stats.memory_usage, 52_428_800);

    // polling continues through failures and the last good stats stay
    wait_for("more failing stats polls", || stub.count("stats") > before + 2).await;
    assert_eq!(page.stats().await, Some(stats));
    assert!(page.refresh_stats().await.is_err());
    page.close().await;
}

#[tokio::test]
async fn test_failed_logs_poll_keeps_previous_logs() {
    let backend = Backend::start().await;
    let stub = backend.stub.clone();
    let mut page = open(&backend).await;
    let updates = page.updates();

    page.set_logs_visible(true).await;
    within(updates.notified()).await;

    stub.fail("logs");
    let before = stub.count("logs");
    wait_for("a failing logs poll", || stub.count("logs") > before).await;
    let logs = page.logs().await;
    assert!(!logs.is_empty());
    assert_eq!(logs[0], "line 1");

    wait_for("more failing logs polls", || stub.count("logs") > before + 2).await;
    assert_eq!(page.logs().await, logs);
    assert!(page.refresh_logs().await.is_err());
    assert_eq!(page.view().await.logs, Some(logs));
    page.close().await;
}

#[tokio::test]
async fn test_logs_polling_stops_when_panel_closes() {
    let backend = Backend::start().await;
    let stub = backend.stub.clone();
    let mut page = open(&backend).await;
    let updates = page.updates();

    assert!(page.view().await.logs.is_none());

    page.toggle_logs().await;
    assert!(page.show_logs());
    assert!(page.is_polling_logs());
    within(updates.notified()).await;
    wait_for("a second logs poll", || stub.count("logs") >= 2).await;
    assert!(!page.logs().await.is_empty());

    page.toggle_logs().await;
    assert!(!page.show_logs());
    assert!(!page.is_polling_logs());
    assert!(page.view().await.logs.is_none());

    // closing waits for the poller task, so the count is final here
    let after_close = stub.count("logs");
    tokio::time::sleep(Duration::from_millis(400)).await;
    assert_eq!(stub.count("logs"), after_close);
    page.close().await;
}

#[tokio::test]
async fn test_updates_notified_on_poll() {
    let backend = Backend::start().await;
    let mut page = open(&backend).await;
    let updates = page.updates();

    page.set_logs_visible(true).await;
    within(updates.notified()).await;
    page.close().await;
}

#[tokio::test]
async fn test_restart() {
    let backend = Backend::start().await;
    let mut page = open(&backend).await;

    assert_eq!(page.restart().await, Ok(()));
    assert!(!page.is_redeploying());
    assert_eq!(backend.stub.count("redeploy"), 1);
    // stats and the deployment are refreshed afterwards
    assert_eq!(backend.stub.count("stats"), 1);
    assert_eq!(backend.stub.count("deployment"), 2);

    backend.stub.fail("redeploy");
    assert_eq!(page.restart().await, Err(RESTART_FAILED.to_string()));
    assert!(!page.is_redeploying());
    page.close().await;
}

#[tokio::test]
async fn test_add_env_rolls_back_on_rejection() {
    let backend = Backend::start().await;
    let mut page = open(&backend).await;
    let original = page.env().as_slice().to_vec();

    backend.stub.fail("env");
    assert!(!page.add_env("API_KEY", "abc").await);
    assert_eq!(page.env().as_slice(), original.as_slice());
    assert_eq!(page.env_error(), Some(ENV_ADD_FAILED));
    assert_eq!(backend.stub.count("env_add"), 1);

    backend.stub.recover("env");
    assert!(page.add_env("API_KEY", "abc").await);
    assert!(page.env_error().is_none());
    assert_eq!(page.env().get("API_KEY").map(|v| v.value.as_str()), Some("abc"));
    assert_eq!(backend.stub.env_of(DEPLOYMENT_ID).len(), 2);
    page.close().await;
}

#[tokio::test]
async fn test_add_env_requires_key() {
    let backend = Backend::start().await;
    let mut page = open(&backend).await;

    assert!(!page.add_env("  ", "value").await);
    assert_eq!(page.env_error(), Some(ENV_KEY_REQUIRED));
    assert_eq!(backend.stub.count("env_add"), 0);
    page.close().await;
}

#[tokio::test]
async fn test_update_env() {
    let backend = Backend::start().await;
    let mut page = open(&backend).await;

    assert!(!page.update_env("NODE_ENV", "   ").await);
    assert_eq!(page.env_error(), Some(ENV_VALUE_EMPTY));
    assert_eq!(backend.stub.count("env_update"), 0);

    assert!(page.update_env("NODE_ENV", "staging").await);
    assert_eq!(
        backend.stub.env_of(DEPLOYMENT_ID),
        vec![EnvVar::new("NODE_ENV", "staging")]
    );
    assert_eq!(page.env().as_slice(), &[EnvVar::new("NODE_ENV", "staging")]);

    backend.stub.fail("env");
    assert!(!page.update_env("NODE_ENV", "broken").await);
    assert_eq!(page.env_error(), Some(ENV_UPDATE_FAILED));
    assert_eq!(page.env().as_slice(), &[EnvVar::new("NODE_ENV", "staging")]);
    assert_eq!(backend.stub.count("env_update"), 2);
    page.close().await;
}

#[tokio::test]
async fn test_dot_keys_rejected_before_request() {
    let backend = Backend::start().await;
    let mut page = open(&backend).await;
    let before = page.env().as_slice().to_vec();

    assert!(!page.update_env(".", "x").await);
    assert!(page.env_error().is_some());
    assert!(!page.delete_env("..").await);
    assert!(!page.delete_env("").await);

    assert_eq!(page.env().as_slice(), before.as_slice());
    assert_eq!(backend.stub.count("env_update"), 0);
    assert_eq!(backend.stub.count("env_delete"), 0);
    page.close().await;
}

#[tokio::test]
async fn test_delete_env_with_encoded_key() {
    let backend = Backend::start().await;
    let mut page = open(&backend).await;

    assert!(page.add_env("A/B C", "1").await);
    assert!(page.delete_env("A/B C").await);
    assert!(page.env().get("A/B C").is_none());
    assert_eq!(
        backend.stub.env_of(DEPLOYMENT_ID),
        vec![EnvVar::new("NODE_ENV", "production")]
    );

    backend.stub.fail("env");
    assert!(!page.delete_env("NODE_ENV").await);
    assert_eq!(page.env_error(), Some(ENV_DELETE_FAILED));
    assert!(page.env().get("NODE_ENV").is_some());
    page.close().await;
}
