//! Icon pipeline errors.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while decoding, validating or encoding server icons.
#[derive(Debug, Error)]
pub enum IconError {
    /// Bitmap does not match the fixed icon dimensions.
    #[error("{reason}: got {}x{}", got.0, got.1)]
    Validation {
        reason: &'static str,
        got: (u32, u32),
    },

    /// File contents are not a decodable image.
    #[error("Failed to decode {}: {reason}", path.display())]
    Decode { path: PathBuf, reason: String },

    /// Re-encoding the bitmap as PNG failed.
    #[error("Failed to encode icon: {0}")]
    Encode(String),

    /// The icon directory or an icon file could not be read.
    #[error("IO error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl IconError {
    /// Short label used for metrics and log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            IconError::Validation { .. } => "validation",
            IconError::Decode { .. } => "decode",
            IconError::Encode(_) => "encode",
            IconError::Io { .. } => "io",
        }
    }
}

/// Result type for icon operations.
pub type IconResult<T> = Result<T, IconError>;
