//! Configuration loading from disk.
//!
//! # Layout
//! ```text
//! <data dir>/
//!     plugin_settings.toml      → PluginSettings
//!     main.toml                 → MotdConfig "default"
//!     extra-configs/<name>.toml → MotdConfig "<name>"
//!     icons/                    → read by IconManager
//! ```
//!
//! Missing directories and default files are created on first load. Existing
//! files are never overwritten.

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

use crate::config::schema::{MotdConfig, PluginSettings, DEFAULT_CONFIG_NAME};
use crate::config::validation::{validate_motd_config, validate_settings, ValidationError};

pub const PLUGIN_SETTINGS_FILE: &str = "plugin_settings.toml";
pub const MAIN_CONFIG_FILE: &str = "main.toml";
pub const EXTRA_CONFIGS_DIR: &str = "extra-configs";
pub const ICONS_DIR: &str = "icons";

const SETTINGS_HEADER: &str = "# MiniMOTD plugin settings\n\n";
const MAIN_HEADER: &str = "# MiniMOTD main configuration\n\
# Additional entries can be placed in extra-configs/<name>.toml\n\
# A MOTD icon names a file in icons/ (without extension); \"random\" picks any of them\n\n";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse error in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed to write defaults to {}: {source}", path.display())]
    Serialize {
        path: PathBuf,
        #[source]
        source: toml::ser::Error,
    },

    #[error("Validation failed in {}: {}", path.display(), join(errors))]
    Validation {
        path: PathBuf,
        errors: Vec<ValidationError>,
    },
}

impl ConfigError {
    /// File or directory the error refers to.
    pub fn path(&self) -> &Path {
        match self {
            ConfigError::Io { path, .. }
            | ConfigError::Parse { path, .. }
            | ConfigError::Serialize { path, .. }
            | ConfigError::Validation { path, .. } => path,
        }
    }
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Everything read from the data directory in one load.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LoadedConfigs {
    pub settings: PluginSettings,
    /// Entry name → config. Always contains `"default"`.
    pub configs: BTreeMap<String, MotdConfig>,
}

/// Reads settings and MOTD entries from a data directory.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    data_dir: PathBuf,
}

impl ConfigStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Directory scanned for icons.
    pub fn icons_dir(&self) -> PathBuf {
        self.data_dir.join(ICONS_DIR)
    }

    /// Load and validate all configuration, bootstrapping defaults first.
    pub fn load_configs(&self) -> Result<LoadedConfigs, ConfigError> {
        self.bootstrap()?;

        let settings_path = self.data_dir.join(PLUGIN_SETTINGS_FILE);
        let settings: PluginSettings = read_toml(&settings_path)?;

        let mut configs = BTreeMap::new();
        let main_path = self.data_dir.join(MAIN_CONFIG_FILE);
        let main = load_motd_config(DEFAULT_CONFIG_NAME, &main_path)?;
        configs.insert(DEFAULT_CONFIG_NAME.to_string(), main);

        for (name, path) in self.extra_config_files()? {
            if name == DEFAULT_CONFIG_NAME {
                return Err(ConfigError::Validation {
                    path,
                    errors: vec![ValidationError {
                        field: name,
                        message: format!("name is reserved for {MAIN_CONFIG_FILE}"),
                    }],
                });
            }
            let config = load_motd_config(&name, &path)?;
            configs.insert(name, config);
        }

        validate_settings(&settings, &configs).map_err(|errors| ConfigError::Validation {
            path: settings_path,
            errors,
        })?;

        tracing::debug!(
            data_dir = %self.data_dir.display(),
            entries = configs.len(),
            "Configuration loaded"
        );

        Ok(LoadedConfigs { settings, configs })
    }

    /// Create missing directories and default files.
    fn bootstrap(&self) -> Result<(), ConfigError> {
        for dir in [
            self.data_dir.clone(),
            self.data_dir.join(EXTRA_CONFIGS_DIR),
            self.data_dir.join(ICONS_DIR),
        ] {
            fs::create_dir_all(&dir).map_err(|source| ConfigError::Io {
                path: dir.clone(),
                source,
            })?;
        }

        write_default(
            &self.data_dir.join(PLUGIN_SETTINGS_FILE),
            SETTINGS_HEADER,
            &PluginSettings::default(),
        )?;
        write_default(
            &self.data_dir.join(MAIN_CONFIG_FILE),
            MAIN_HEADER,
            &MotdConfig::default(),
        )
    }

    /// `(entry name, path)` of every extra config, sorted by name.
    fn extra_config_files(&self) -> Result<Vec<(String, PathBuf)>, ConfigError> {
        let dir = self.data_dir.join(EXTRA_CONFIGS_DIR);
        let io_err = |source| ConfigError::Io { path: dir.clone(), source };

        let mut files = Vec::new();
        for entry in fs::read_dir(&dir).map_err(io_err)? {
            let path = entry.map_err(io_err)?.path();
            if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some("toml") {
                continue;
            }
            if let Some(name) = path.file_stem().and_then(|s| s.to_str()) {
                files.push((name.to_string(), path));
            }
        }
        files.sort();
        Ok(files)
    }
}

fn load_motd_config(name: &str, path: &Path) -> Result<MotdConfig, ConfigError> {
    let config: MotdConfig = read_toml(path)?;
    validate_motd_config(name, &config).map_err(|errors| ConfigError::Validation {
        path: path.to_path_buf(),
        errors,
    })?;
    Ok(config)
}

fn read_toml<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Write `value` to `path` unless the file already exists.
fn write_default<T: Serialize>(path: &Path, header: &str, value: &T) -> Result<(), ConfigError> {
    if path.exists() {
        return Ok(());
    }

    let body = toml::to_string_pretty(value).map_err(|source| ConfigError::Serialize {
        path: path.to_path_buf(),
        source,
    })?;

    let io_err = |source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    };
    let mut file = match fs::OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => return Ok(()),
        Err(e) => return Err(io_err(e)),
    };
    file.write_all(header.as_bytes()).map_err(io_err)?;
    file.write_all(body.as_bytes()).map_err(io_err)?;

    tracing::info!(path = %path.display(), "Created default config file");
    Ok(())
}
