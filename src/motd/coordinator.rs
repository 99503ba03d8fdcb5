//! Snapshot publication and reload coordination.
//!
//! # Reload Protocol
//! ```text
//! reload()
//!     → ConfigStore::load_configs()   (local, unpublished)
//!     → IconManager::load_icons()     (local, unpublished)
//!     → MotdSnapshot::new(next generation)
//!     → ArcSwap::store                (single atomic publish)
//!
//! any step fails → previous snapshot stays published, error returned
//! ```
//!
//! # Design Decisions
//! - Readers call `current()`, a lock-free `ArcSwap` load
//! - A writer-only mutex orders concurrent reloads; readers never take it
//! - Construction loads synchronously, so there is no empty state

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use arc_swap::ArcSwap;
use thiserror::Error;

use crate::config::{ConfigError, ConfigStore};
use crate::icon::{EncodedIcon, IconError, IconManager};
use crate::motd::snapshot::MotdSnapshot;
use crate::observability::metrics;

/// Why a reload could not produce a new snapshot.
#[derive(Debug, Error)]
pub enum ReloadError {
    #[error("config: {0}")]
    Config(#[from] ConfigError),

    #[error("icons: {0}")]
    Icons(#[from] IconError),
}

/// Owns the currently published snapshot and the sources it is built from.
pub struct ReloadCoordinator {
    config_store: ConfigStore,
    icon_manager: IconManager,
    current: ArcSwap<MotdSnapshot>,
    next_generation: AtomicU64,
    reload_lock: Mutex<()>,
}

impl std::fmt::Debug for ReloadCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReloadCoordinator")
            .field("config_store", &self.config_store)
            .field("icon_manager", &self.icon_manager)
            .field("generation", &self.generation())
            .finish()
    }
}

impl ReloadCoordinator {
    /// Load the initial snapshot. Fails if configuration or icons cannot be
    /// loaded; callers treat this as fatal.
    pub fn new(config_store: ConfigStore, icon_manager: IconManager) -> Result<Self, ReloadError> {
        let initial = build_snapshot(&config_store, &icon_manager, 1)?;
        metrics::record_generation(1);

        tracing::info!(
            generation = 1,
            configs = initial.configs().len(),
            icons = initial.icons().len(),
            "Initial MOTD snapshot loaded"
        );

        Ok(Self {
            config_store,
            icon_manager,
            current: ArcSwap::from_pointee(initial),
            next_generation: AtomicU64::new(2),
            reload_lock: Mutex::new(()),
        })
    }

    /// The most recently published snapshot. Never blocks.
    pub fn current(&self) -> Arc<MotdSnapshot> {
        self.current.load_full()
    }

    /// Generation of the most recently published snapshot.
    pub fn generation(&self) -> u64 {
        self.current.load().generation()
    }

    /// Look up an icon in the current snapshot.
    pub fn icon(&self, name: &str) -> Option<EncodedIcon> {
        self.current.load().icon(name).cloned()
    }

    pub fn config_store(&self) -> &ConfigStore {
        &self.config_store
    }

    pub fn icon_manager(&self) -> &IconManager {
        &self.icon_manager
    }

    /// Rebuild configs and icons and publish the result.
    ///
    /// On error the previously published snapshot remains current.
    pub fn reload(&self) -> Result<Arc<MotdSnapshot>, ReloadError> {
        let _guard = self.reload_lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());

        let previous = self.generation();
        let generation = self.next_generation.fetch_add(1, Ordering::Relaxed);

        match build_snapshot(&self.config_store, &self.icon_manager, generation) {
            Ok(snapshot) => {
                let snapshot = Arc::new(snapshot);
                self.current.store(Arc::clone(&snapshot));

                metrics::record_reload(true);
                metrics::record_generation(generation);
                tracing::info!(
                    previous,
                    generation,
                    configs = snapshot.configs().len(),
                    icons = snapshot.icons().len(),
                    "MOTD snapshot reloaded"
                );
                Ok(snapshot)
            }
            Err(e) => {
                metrics::record_reload(false);
                tracing::error!(
                    generation = previous,
                    error = %e,
                    "Reload failed. Keeping current snapshot."
                );
                Err(e)
            }
        }
    }
}

fn build_snapshot(
    config_store: &ConfigStore,
    icon_manager: &IconManager,
    generation: u64,
) -> Result<MotdSnapshot, ReloadError> {
    let configs = config_store.load_configs()?;
    let icons = icon_manager.load_icons()?;
    Ok(MotdSnapshot::new(generation, configs, icons))
}
