//! Thumbnails and reduced-quality preview renders.
//!
//! A preview at `quality` percent shrinks the source and every pixel-valued
//! setting by the same factor before compositing, so it looks like a scaled
//! down copy of the full render. Percentage settings already follow the
//! image and are left alone.

use crate::config::CompositeConfig;
use crate::imaging::{CompositeError, process};
use image::imageops::FilterType;
use image::{DynamicImage, RgbaImage};
use tracing::debug;

/// Longest edge of a thumbnail unless the caller asks otherwise.
pub const THUMBNAIL_MAX_SIZE: u32 = 600;

pub const MIN_QUALITY: u32 = 10;
pub const MAX_QUALITY: u32 = 100;

/// Shrink `image` so its longest edge is at most `max_size`, keeping the
/// aspect ratio. Images already small enough are returned unchanged.
pub fn create_thumbnail(image: &DynamicImage, max_size: u32) -> DynamicImage {
    let (width, height) = (image.width(), image.height());
    if width.max(height) <= max_size {
        return image.clone();
    }
    let (w, h) = thumbnail_dimensions((width, height), max_size);
    image.resize_exact(w, h, FilterType::Lanczos3)
}

/// Dimensions for [`create_thumbnail`]: longest edge `max_size`, the other
/// edge truncated, neither below 1.
///
/// # Examples
/// ```
/// # use glassframe::preview::thumbnail_dimensions;
/// assert_eq!(thumbnail_dimensions((1200, 800), 600), (600, 400));
/// assert_eq!(thumbnail_dimensions((1000, 3000), 600), (200, 600));
/// assert_eq!(thumbnail_dimensions((300, 200), 600), (300, 200));
/// ```
pub fn thumbnail_dimensions(source: (u32, u32), max_size: u32) -> (u32, u32) {
    let (width, height) = source;
    let longest = width.max(height);
    if longest <= max_size || longest == 0 {
        return source;
    }
    let scale = max_size as f64 / longest as f64;
    (
        ((width as f64 * scale) as u32).max(1),
        ((height as f64 * scale) as u32).max(1),
    )
}

/// Render `image` at `quality` percent of full resolution.
///
/// Quality is clamped to `10..=100`; 100 is identical to [`process`].
pub fn render_preview(
    image: &DynamicImage,
    config: &CompositeConfig,
    quality: u32,
) -> Result<RgbaImage, CompositeError> {
    let quality = quality.clamp(MIN_QUALITY, MAX_QUALITY);
    if quality == MAX_QUALITY {
        return process(image, config);
    }

    let factor = quality as f64 / 100.0;
    let w = ((image.width() as f64 * factor) as u32).max(1);
    let h = ((image.height() as f64 * factor) as u32).max(1);
    debug!(quality, w, h, "Rendering preview");

    let base = image.resize_exact(w, h, FilterType::Lanczos3);
    process(&base, &config.scaled(factor))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Length, MarginConfig};
    use crate::test_helpers::gradient_rgb;

    // =========================================================================
    // Thumbnails
    // =========================================================================

    #[test]
    fn thumbnail_bounds_longest_edge() {
        let thumb = create_thumbnail(&gradient_rgb(1200, 900), THUMBNAIL_MAX_SIZE);
        assert_eq!((thumb.width(), thumb.height()), (600, 450));
    }

    #[test]
    fn thumbnail_never_enlarges() {
        let source = gradient_rgb(80, 40);
        let thumb = create_thumbnail(&source, THUMBNAIL_MAX_SIZE);
        assert_eq!(thumb, source);
    }

    #[test]
    fn thumbnail_of_extreme_aspect_keeps_one_pixel() {
        assert_eq!(thumbnail_dimensions((5000, 2), 100), (100, 1));
    }

    // =========================================================================
    // Preview render
    // =========================================================================

    #[test]
    fn full_quality_equals_process() {
        let source = gradient_rgb(40, 30);
        let config = CompositeConfig::default();
        assert_eq!(
            render_preview(&source, &config, 100).unwrap(),
            process(&source, &config).unwrap()
        );
    }

    #[test]
    fn half_quality_halves_pixel_geometry() {
        let mut config = CompositeConfig::default();
        config.margin = MarginConfig::uniform(Length::Pixels(20));
        let out = render_preview(&gradient_rgb(400, 300), &config, 50).unwrap();
        // 200x150 source with 10px margins
        assert_eq!(out.dimensions(), (220, 170));
    }

    #[test]
    fn quality_is_clamped() {
        let mut config = CompositeConfig::default();
        config.margin = MarginConfig::uniform(Length::Pixels(0));
        config.shadow.enabled = false;
        let low = render_preview(&gradient_rgb(100, 100), &config, 1).unwrap();
        assert_eq!(low.dimensions(), (10, 10));
        let high = render_preview(&gradient_rgb(100, 100), &config, 250).unwrap();
        assert_eq!(high.dimensions(), (100, 100));
    }
}
