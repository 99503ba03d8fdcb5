//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! config / icon / motd subsystems produce:
//!     → logging.rs (structured tracing events)
//!     → metrics.rs (reload and icon counters)
//!
//! Consumers:
//!     → stdout (pretty or JSON)
//!     → whatever metrics recorder the host installs
//! ```

pub mod logging;
pub mod metrics;
