//! Icon validation and data-URI encoding.
//!
//! # Responsibilities
//! - Enforce the fixed 64x64 icon dimensions
//! - Re-encode bitmaps as PNG
//! - Wrap the PNG bytes in a `data:image/png;base64,` URI
//!
//! # Design Decisions
//! - Hard validation gate: no resizing, cropping or coercion
//! - Pure transformation, buffers live only for the duration of the call
//! - Decoding is a pluggable capability (`IconDecoder`) so callers can feed
//!   synthetic bitmaps

use std::fmt;
use std::sync::Arc;

use base64::{engine::general_purpose, Engine as _};
use image::{codecs::png::PngEncoder, ExtendedColorType, ImageEncoder, RgbaImage};
use serde::{Serialize, Serializer};

use crate::icon::error::{IconError, IconResult};

/// Required icon width and height in pixels.
pub const ICON_SIZE: u32 = 64;

/// MIME type of every encoded icon.
pub const ICON_MIME_TYPE: &str = "image/png";

/// Scheme marker prepended to the base64 payload.
pub const DATA_URI_PREFIX: &str = "data:image/png;base64,";

/// A decoded bitmap with explicit pixel dimensions.
pub type Bitmap = RgbaImage;

/// Boxed error returned by decoders.
pub type DecodeFailure = Box<dyn std::error::Error + Send + Sync>;

/// Turns raw file bytes into a bitmap.
pub trait IconDecoder: Send + Sync {
    /// Decode the given bytes.
    fn decode(&self, bytes: &[u8]) -> Result<Bitmap, DecodeFailure>;
}

impl<F> IconDecoder for F
where
    F: Fn(&[u8]) -> Result<Bitmap, DecodeFailure> + Send + Sync,
{
    fn decode(&self, bytes: &[u8]) -> Result<Bitmap, DecodeFailure> {
        self(bytes)
    }
}

/// Decoder backed by the `image` crate. Format is sniffed from the content.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageDecoder;

impl IconDecoder for ImageDecoder {
    fn decode(&self, bytes: &[u8]) -> Result<Bitmap, DecodeFailure> {
        let image = image::load_from_memory(bytes)?;
        Ok(image.to_rgba8())
    }
}

/// A validated icon, ready to embed in a status response.
#[derive(Clone, PartialEq, Eq)]
pub struct EncodedIcon {
    uri: Arc<str>,
}

impl EncodedIcon {
    /// The complete data URI.
    pub fn as_str(&self) -> &str {
        &self.uri
    }

    /// MIME type declared by the URI.
    pub fn mime_type(&self) -> &'static str {
        ICON_MIME_TYPE
    }

    /// The base64 payload without the scheme marker.
    pub fn payload(&self) -> &str {
        &self.uri[DATA_URI_PREFIX.len()..]
    }

    /// Decode the payload back into PNG bytes.
    pub fn decode_payload(&self) -> Result<Vec<u8>, base64::DecodeError> {
        general_purpose::STANDARD.decode(self.payload())
    }
}

impl fmt::Debug for EncodedIcon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncodedIcon")
            .field("mime_type", &ICON_MIME_TYPE)
            .field("payload_len", &self.payload().len())
            .finish()
    }
}

impl fmt::Display for EncodedIcon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.uri)
    }
}

impl Serialize for EncodedIcon {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.uri)
    }
}

/// Validate a bitmap and encode it as a PNG data URI.
pub fn encode(bitmap: &Bitmap) -> IconResult<EncodedIcon> {
    let (width, height) = bitmap.dimensions();
    if width != ICON_SIZE || height != ICON_SIZE {
        return Err(IconError::Validation {
            reason: "invalid dimensions",
            got: (width, height),
        });
    }

    let mut png = Vec::new();
    PngEncoder::new(&mut png)
        .write_image(bitmap.as_raw(), width, height, ExtendedColorType::Rgba8)
        .map_err(|e| IconError::Encode(e.to_string()))?;

    let mut uri = String::with_capacity(DATA_URI_PREFIX.len() + png.len() * 4 / 3 + 4);
    uri.push_str(DATA_URI_PREFIX);
    general_purpose::STANDARD.encode_string(&png, &mut uri);

    Ok(EncodedIcon { uri: uri.into() })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn gradient(width: u32, height: u32) -> Bitmap {
        RgbaImage::from_fn(width, height, |x, y| {
            Rgba([(x * 4) as u8, (y * 4) as u8, ((x + y) * 2) as u8, 255])
        })
    }

    #[test]
    fn test_rejects_wrong_dimensions() {
        for (w, h) in [(63, 64), (64, 63), (128, 128), (1, 1), (64, 65)] {
            match encode(&gradient(w, h)) {
                Err(IconError::Validation { reason, got }) => {
                    assert_eq!(reason, "invalid dimensions");
                    assert_eq!(got, (w, h));
                }
                other => panic!("expected validation error for {w}x{h}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_output_has_data_uri_prefix() {
        let icon = encode(&gradient(64, 64)).unwrap();
        assert!(icon.as_str().starts_with(DATA_URI_PREFIX));
        assert_eq!(icon.mime_type(), "image/png");
        assert!(!icon.payload().contains('\n'));
    }

    #[test]
    fn test_encoding_is_deterministic() {
        let first = encode(&gradient(64, 64)).unwrap();
        let second = encode(&gradient(64, 64)).unwrap();
        assert_eq!(first.as_str(), second.as_str());
    }

    #[test]
    fn test_payload_round_trips_to_same_pixels() {
        let original = gradient(64, 64);
        let icon = encode(&original).unwrap();

        let png = icon.decode_payload().unwrap();
        let decoded = ImageDecoder.decode(&png).unwrap();

        assert_eq!(decoded.dimensions(), (64, 64));
        assert_eq!(decoded.as_raw(), original.as_raw());
    }

    #[test]
    fn test_closure_decoder() {
        let decoder = |_: &[u8]| -> Result<Bitmap, DecodeFailure> { Ok(gradient(64, 64)) };
        let bitmap = decoder.decode(b"anything").unwrap();
        assert_eq!(bitmap.dimensions(), (64, 64));
    }

    #[test]
    fn test_image_decoder_rejects_garbage() {
        assert!(ImageDecoder.decode(b"definitely not an image").is_err());
    }
}
