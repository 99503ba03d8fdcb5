//! Foreground reload loop.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use crate::lifecycle::signals::{Signal, Signals};
use crate::motd::ReloadCoordinator;

/// Quiet period after a file change before reloading.
pub const DEBOUNCE: Duration = Duration::from_millis(500);

/// Run until a shutdown signal arrives, reloading on SIGHUP and on data
/// directory changes.
pub async fn run(
    coordinator: Arc<ReloadCoordinator>,
    mut changes: Option<mpsc::UnboundedReceiver<PathBuf>>,
) -> std::io::Result<()> {
    let mut signals = Signals::new()?;
    tracing::info!(generation = coordinator.generation(), "Serving MOTD snapshot");

    loop {
        tokio::select! {
            signal = signals.recv() => match signal {
                Signal::Reload => {
                    tracing::info!("Reload signal received");
                    reload(&coordinator).await;
                }
                Signal::Shutdown => {
                    tracing::info!("Shutdown signal received");
                    break;
                }
            },
            Some(path) = next_change(&mut changes) => {
                tracing::info!(path = %path.display(), "Data directory changed, reloading...");
                if let Some(rx) = changes.as_mut() {
                    settle(rx).await;
                }
                reload(&coordinator).await;
            }
        }
    }

    Ok(())
}

/// Reload on a blocking thread so file I/O stays off the async workers.
/// Returns whether a new snapshot was published.
pub async fn reload(coordinator: &Arc<ReloadCoordinator>) -> bool {
    let coordinator = Arc::clone(coordinator);
    match tokio::task::spawn_blocking(move || coordinator.reload()).await {
        Ok(Ok(_)) => true,
        // Already logged by the coordinator.
        Ok(Err(_)) => false,
        Err(e) => {
            tracing::error!(error = %e, "Reload task panicked");
            false
        }
    }
}

async fn next_change(
    changes: &mut Option<mpsc::UnboundedReceiver<PathBuf>>,
) -> Option<PathBuf> {
    match changes {
        Some(rx) => rx.recv().await,
        None => std::future::pending().await,
    }
}

/// Swallow further events until the directory has been quiet for `DEBOUNCE`.
async fn settle(rx: &mut mpsc::UnboundedReceiver<PathBuf>) {
    while let Ok(Some(path)) = tokio::time::timeout(DEBOUNCE, rx.recv()).await {
        tracing::trace!(path = %path.display(), "Coalescing change");
    }
}
