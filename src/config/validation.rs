//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check that `fake_players` expressions parse
//! - Check that virtual hosts and the default entry reference loaded configs
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is a pure function over already parsed values
//! - Runs before configs are handed to the reload coordinator

use std::collections::BTreeMap;
use std::fmt;

use crate::config::schema::{MotdConfig, PluginSettings};

/// A single semantic problem in a loaded configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field, prefixed by the entry name.
    pub field: String,
    pub message: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a single MOTD entry.
pub fn validate_motd_config(name: &str, config: &MotdConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.player_count.fake_players_enabled {
        if let Err(message) = config.player_count.fake_players_mode() {
            errors.push(ValidationError {
                field: format!("{name}.player_count.fake_players"),
                message,
            });
        }
    }

    for (index, motd) in config.motds.iter().enumerate() {
        if motd.icon.as_deref().is_some_and(|icon| icon.trim().is_empty()) {
            errors.push(ValidationError {
                field: format!("{name}.motds[{index}].icon"),
                message: "icon name must not be blank".to_string(),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validate plugin settings against the set of loaded entry names.
pub fn validate_settings(
    settings: &PluginSettings,
    configs: &BTreeMap<String, MotdConfig>,
) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if !configs.contains_key(&settings.proxy.default_config) {
        errors.push(ValidationError {
            field: "proxy.default_config".to_string(),
            message: format!("unknown config '{}'", settings.proxy.default_config),
        });
    }

    for (host, target) in &settings.proxy.virtual_hosts {
        if !configs.contains_key(target) {
            errors.push(ValidationError {
                field: format!("proxy.virtual_hosts.\"{host}\""),
                message: format!("unknown config '{target}'"),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
