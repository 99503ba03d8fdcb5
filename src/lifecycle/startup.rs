//! Startup orchestration.
//!
//! # Responsibilities
//! - Build the config store and icon manager for a data directory
//! - Load and publish the first snapshot
//! - Optionally start the data directory watcher
//!
//! # Design Decisions
//! - Fail fast: the first load must succeed, there is no empty state
//! - Components are constructed once and shared through `Arc`

use std::path::{Path, PathBuf};
use std::sync::Arc;

use notify::RecommendedWatcher;
use tokio::sync::mpsc;

use crate::config::watcher::ConfigWatcher;
use crate::config::ConfigStore;
use crate::icon::IconManager;
use crate::motd::{ReloadCoordinator, ReloadError};

/// Load the data directory and return the coordinator serving it.
pub fn start(data_dir: &Path) -> Result<Arc<ReloadCoordinator>, ReloadError> {
    tracing::info!(data_dir = %data_dir.display(), "Loading MiniMOTD");

    let config_store = ConfigStore::new(data_dir);
    let icon_manager = IconManager::new(config_store.icons_dir());
    let coordinator = ReloadCoordinator::new(config_store, icon_manager)?;

    let snapshot = coordinator.current();
    if snapshot.settings().update_checker {
        tracing::debug!("Update checking is enabled and left to the host");
    }

    Ok(Arc::new(coordinator))
}

/// Start watching the data directory if the loaded settings ask for it.
///
/// The watcher handle must be kept alive for events to flow.
pub fn watch_if_enabled(
    coordinator: &ReloadCoordinator,
) -> Result<Option<(RecommendedWatcher, mpsc::UnboundedReceiver<PathBuf>)>, notify::Error> {
    if !coordinator.current().settings().watch_for_changes {
        return Ok(None);
    }

    let (watcher, changes) = ConfigWatcher::new(coordinator.config_store().data_dir());
    Ok(Some((watcher.run()?, changes)))
}
