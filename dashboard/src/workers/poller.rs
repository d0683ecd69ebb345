//! Polling worker for periodic refreshes

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::errors::DashError;

/// Poller worker options
#[derive(Debug, Clone)]
pub struct Options {
    /// Polling interval
    pub interval: Duration,

    /// Initial delay before first poll
    pub initial_delay: Duration,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(10),
            initial_delay: Duration::ZERO,
        }
    }
}

impl Options {
    pub fn every(interval: Duration) -> Self {
        Self {
            interval,
            ..Default::default()
        }
    }
}

/// Run a poller until the shutdown signal resolves.
///
/// `tick` runs once after the initial delay and then once per interval. A
/// failed tick is logged and the next one happens on schedule.
pub async fn run<T, TF, S, F>(
    name: &str,
    options: &Options,
    mut tick: T,
    sleep_fn: S,
    mut shutdown_signal: Pin<Box<dyn Future<Output = ()> + Send>>,
) where
    T: FnMut() -> TF,
    TF: Future<Output = Result<(), DashError>>,
    S: Fn(Duration) -> F,
    F: Future<Output = ()>,
{
    info!("{} poller starting...", name);

    if !options.initial_delay.is_zero() {
        tokio::select! {
            _ = &mut shutdown_signal => {
                info!("{} poller shutting down...", name);
                return;
            }
            _ = sleep_fn(options.initial_delay) => {}
        }
    }

    loop {
        debug!("Polling {}...", name);

        if let Err(e) = tick().await {
            warn!("{} poll failed: {}", name, e);
        }

        tokio::select! {
            _ = &mut shutdown_signal => {
                info!("{} poller shutting down...", name);
                return;
            }
            _ = sleep_fn(options.interval) => {}
        }
    }
}

/// Handle to a poller running on the tokio runtime.
///
/// Dropping the handle also stops the poller, without waiting for it.
pub struct Poller {
    name: String,
    shutdown_tx: oneshot::Sender<()>,
    handle: JoinHandle<()>,
}

impl Poller {
    /// Spawn a poller driven by `tokio::time::sleep`
    pub fn spawn<T, TF>(name: impl Into<String>, options: Options, tick: T) -> Self
    where
        T: FnMut() -> TF + Send + 'static,
        TF: Future<Output = Result<(), DashError>> + Send + 'static,
    {
        let name = name.into();
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let shutdown_signal: Pin<Box<dyn Future<Output = ()> + Send>> = Box::pin(async move {
            let _ = shutdown_rx.await;
        });

        let task_name = name.clone();
        let handle = tokio::spawn(async move {
            run(&task_name, &options, tick, tokio::time::sleep, shutdown_signal).await;
        });

        Self {
            name,
            shutdown_tx,
            handle,
        }
    }

    /// Signal shutdown and wait for the poller to exit
    pub async fn stop(self) {
        let _ = self.shutdown_tx.send(());
        if let Err(e) = self.handle.await {
            error!("{} poller task failed: {}", self.name, e);
        }
    }
}
