//! Live deployment view loop

use std::future::Future;

use tracing::info;

use crate::pages::deployment::DeploymentPage;
use crate::render::render_deployment_page;

const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

/// Keep the deployment page on screen, redrawing whenever a poller stores
/// fresh data, until `shutdown_signal` resolves. Pollers are stopped on exit.
pub async fn watch(
    mut page: DeploymentPage,
    domain: &str,
    show_logs: bool,
    shutdown_signal: impl Future<Output = ()>,
) {
    page.start_stats_polling();
    page.set_logs_visible(show_logs).await;

    let updates = page.updates();
    tokio::pin!(shutdown_signal);

    loop {
        print!("{}{}", CLEAR_SCREEN, render_deployment_page(&page.view().await, domain));

        tokio::select! {
            _ = updates.notified() => {}
            _ = &mut shutdown_signal => {
                info!("Shutdown signal received, leaving deployment view...");
                break;
            }
        }
    }

    page.close().await;
}

/// Resolve on SIGTERM, SIGINT or Ctrl+C
pub async fn await_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let (mut sigterm, mut sigint) = match (
            signal(SignalKind::terminate()),
            signal(SignalKind::interrupt()),
        ) {
            (Ok(term), Ok(int)) => (term, int),
            _ => {
                let _ = tokio::signal::ctrl_c().await;
                info!("Ctrl+C received, shutting down...");
                return;
            }
        };

        tokio::select! {
            _ = sigterm.recv() => {
                info!("SIGTERM received, shutting down...");
            }
            _ = sigint.recv() => {
                info!("SIGINT received, shutting down...");
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Ctrl+C received, shutting down...");
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
        info!("Ctrl+C received, shutting down...");
    }
}
