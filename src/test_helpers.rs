//! Shared test utilities for the glassframe test suite.
//!
//! Synthetic images and fixture writers, so tests never depend on binary
//! files checked into the repository.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let photo = gradient_rgb(400, 300);
//! let out = process(&photo, &CompositeConfig::default()).unwrap();
//! ```

use image::{DynamicImage, Rgb, RgbImage};
use std::path::Path;

// =========================================================================
// Synthetic images
// =========================================================================

/// Opaque image of a single color.
pub fn flat_rgb(width: u32, height: u32, color: [u8; 3]) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb(color)))
}

/// Opaque image whose red channel ramps with x and green with y, so every
/// region is distinguishable.
pub fn gradient_rgb(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
        Rgb([
            (x * 255 / width.max(1)) as u8,
            (y * 255 / height.max(1)) as u8,
            128,
        ])
    }))
}

// =========================================================================
// Fixture files
// =========================================================================

/// Write a gradient PNG to `path`. Panics on failure.
pub fn write_png(path: &Path, width: u32, height: u32) {
    gradient_rgb(width, height)
        .save_with_format(path, image::ImageFormat::Png)
        .unwrap_or_else(|e| panic!("failed to write {}: {e}", path.display()));
}

/// Write a text file to `path`. Panics on failure.
pub fn write_text(path: &Path, content: &str) {
    std::fs::write(path, content)
        .unwrap_or_else(|e| panic!("failed to write {}: {e}", path.display()));
}
