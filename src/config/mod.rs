//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! data directory (TOML)
//!     → loader.rs (bootstrap defaults, parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → LoadedConfigs (validated, immutable)
//!     → handed to the reload coordinator
//!
//! On change (optional):
//!     watcher.rs detects change
//!     → coordinator reloads configs and icons
//!     → atomic swap of the published snapshot
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require full reload
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use loader::{ConfigError, ConfigStore, LoadedConfigs};
pub use schema::{Motd, MotdConfig, PlayerCountSettings, PluginSettings, ProxySettings};
