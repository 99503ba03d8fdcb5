//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Bootstrap data dir → Load configs → Load icons → Publish generation 1
//!
//! Runner (runner.rs):
//!     SIGHUP or data dir change → reload on a blocking thread
//!     SIGTERM/SIGINT            → stop
//!
//! Signals (signals.rs):
//!     OS signals → Signal::{Reload, Shutdown}
//! ```
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Reload failures are logged and never stop the runner

pub mod runner;
pub mod signals;
pub mod startup;

pub use signals::Signal;
