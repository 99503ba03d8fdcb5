//! Server icon pipeline.
//!
//! # Data Flow
//! ```text
//! icons/<name>.<ext>
//!     → manager.rs (scan, read bytes)
//!     → IconDecoder (bytes → Bitmap)
//!     → codec.rs (64x64 gate, PNG + base64 data URI)
//!     → IconCache (name → EncodedIcon)
//! ```

pub mod codec;
pub mod error;
pub mod manager;

pub use codec::{Bitmap, EncodedIcon, IconDecoder, ImageDecoder, ICON_SIZE};
pub use error::IconError;
pub use manager::{IconCache, IconManager};
