//! Immutable MOTD snapshot.

use std::collections::BTreeMap;
use std::sync::LazyLock;
use std::time::SystemTime;

use crate::config::schema::{MotdConfig, PluginSettings, DEFAULT_CONFIG_NAME};
use crate::config::LoadedConfigs;
use crate::icon::{EncodedIcon, IconCache};

/// Fully resolved settings, entry configs and icons at one point in time.
///
/// Never mutated after construction. Readers holding an `Arc` to an older
/// snapshot keep a consistent view while newer ones are published.
#[derive(Debug, Clone)]
pub struct MotdSnapshot {
    generation: u64,
    loaded_at: SystemTime,
    settings: PluginSettings,
    configs: BTreeMap<String, MotdConfig>,
    icons: IconCache,
}

impl MotdSnapshot {
    pub fn new(generation: u64, loaded: LoadedConfigs, icons: IconCache) -> Self {
        Self {
            generation,
            loaded_at: SystemTime::now(),
            settings: loaded.settings,
            configs: loaded.configs,
            icons,
        }
    }

    /// Monotonic id, incremented on every successful reload.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn loaded_at(&self) -> SystemTime {
        self.loaded_at
    }

    pub fn settings(&self) -> &PluginSettings {
        &self.settings
    }

    pub fn configs(&self) -> &BTreeMap<String, MotdConfig> {
        &self.configs
    }

    pub fn config(&self, name: &str) -> Option<&MotdConfig> {
        self.configs.get(name)
    }

    /// Config entry for the host a client connected through.
    ///
    /// Falls back to the `"default"` entry, which every snapshot has.
    pub fn config_for_host(&self, host: Option<&str>) -> &MotdConfig {
        let name = self.settings.proxy.config_for_host(host);
        self.configs
            .get(name)
            .or_else(|| self.configs.get(DEFAULT_CONFIG_NAME))
            .unwrap_or(&FALLBACK_CONFIG)
    }

    pub fn icons(&self) -> &IconCache {
        &self.icons
    }

    pub fn icon(&self, name: &str) -> Option<&EncodedIcon> {
        self.icons.get(name)
    }
}

/// Used only by snapshots assembled by hand without a `"default"` entry.
static FALLBACK_CONFIG: LazyLock<MotdConfig> = LazyLock::new(MotdConfig::default);
