//! Rounded-corner foreground.

use super::shapes::rounded_rect_mask;
use image::{DynamicImage, RgbaImage};

/// Convert `image` to RGBA and cut its corners to `radius` pixels.
///
/// Radius 0 returns the pixels untouched. Otherwise each alpha becomes the
/// lesser of the existing alpha and the rounded-rectangle mask. The radius is
/// not clamped to the image here; callers pass at most half the short side.
pub fn apply_round_corners(image: &DynamicImage, radius: u32) -> RgbaImage {
    let mut rgba = image.to_rgba8();
    if radius == 0 {
        return rgba;
    }

    let (width, height) = rgba.dimensions();
    let mask = rounded_rect_mask(width, height, radius);
    for (pixel, coverage) in rgba.pixels_mut().zip(mask.pixels()) {
        pixel.0[3] = pixel.0[3].min(coverage.0[0]);
    }
    rgba
}
