//! MOTD snapshot, reload coordination and per-probe composition.
//!
//! # Data Flow
//! ```text
//! ConfigStore + IconManager
//!     → coordinator.rs (build, validate, atomic publish)
//!     → snapshot.rs (immutable, shared via Arc)
//!     → compose.rs (snapshot + live player counts → StatusResponse)
//! ```

pub mod compose;
pub mod coordinator;
pub mod snapshot;

pub use compose::{compose, PlayerCount, StatusResponse};
pub use coordinator::{ReloadCoordinator, ReloadError};
pub use snapshot::MotdSnapshot;
