//! Data directory watcher for hot reload.

use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::icon::manager::SUPPORTED_EXTENSIONS;

/// A watcher that monitors the data directory for changes.
///
/// It only signals; the receiver decides when to reload.
pub struct ConfigWatcher {
    path: PathBuf,
    change_tx: mpsc::UnboundedSender<PathBuf>,
}

impl ConfigWatcher {
    /// Create a new ConfigWatcher.
    ///
    /// Returns the watcher and a receiver of changed paths.
    pub fn new(path: &Path) -> (Self, mpsc::UnboundedReceiver<PathBuf>) {
        let (change_tx, change_rx) = mpsc::unbounded_channel();

        (
            Self {
                path: path.to_path_buf(),
                change_tx,
            },
            change_rx,
        )
    }

    /// Start watching. The returned handle must be kept alive.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let tx = self.change_tx.clone();

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    if !is_reload_event(&event.kind) {
                        return;
                    }
                    for path in event.paths.into_iter().filter(|p| is_relevant(p)) {
                        tracing::debug!(path = %path.display(), "Data directory change detected");
                        let _ = tx.send(path);
                    }
                }
                Err(e) => tracing::error!(error = ?e, "Watch error"),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        watcher.watch(&self.path, RecursiveMode::Recursive)?;

        tracing::info!(path = %self.path.display(), "Config watcher started");
        Ok(watcher)
    }
}

fn is_reload_event(kind: &EventKind) -> bool {
    kind.is_modify() || kind.is_create() || kind.is_remove()
}

/// Config files and icon images trigger reloads; editor swap files do not.
fn is_relevant(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            ext.eq_ignore_ascii_case("toml")
                || SUPPORTED_EXTENSIONS.iter().any(|s| s.eq_ignore_ascii_case(ext))
        })
        .unwrap_or(false)
}
