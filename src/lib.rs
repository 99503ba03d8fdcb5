//! MiniMOTD: server list MOTD and icon snapshots with atomic reload.

pub mod command;
pub mod config;
pub mod icon;
pub mod lifecycle;
pub mod motd;
pub mod observability;

pub use config::{ConfigStore, PluginSettings};
pub use icon::{EncodedIcon, IconCache, IconManager};
pub use motd::{MotdSnapshot, ReloadCoordinator, ReloadError, StatusResponse};
