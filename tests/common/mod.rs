//! Shared utilities for integration tests.

use std::fs;
use std::io::Cursor;
use std::path::Path;

use image::{ImageFormat, Rgba, RgbaImage};

/// Write a solid square image of `size` pixels to `dir/name` in the format
/// implied by the extension.
pub fn write_icon(dir: &Path, name: &str, size: u32, shade: u8) {
    let format = ImageFormat::from_path(name).unwrap();
    let image = RgbaImage::from_pixel(size, size, Rgba([shade, 255 - shade, 64, 255]));

    let mut bytes = Cursor::new(Vec::new());
    image.write_to(&mut bytes, format).unwrap();

    fs::create_dir_all(dir).unwrap();
    fs::write(dir.join(name), bytes.into_inner()).unwrap();
}

/// Write raw bytes that are not a valid image.
#[allow(dead_code)]
pub fn write_garbage(dir: &Path, name: &str) {
    fs::create_dir_all(dir).unwrap();
    fs::write(dir.join(name), b"this is not an image").unwrap();
}
