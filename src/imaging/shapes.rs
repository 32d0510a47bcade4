//! Single-channel mask primitives shared by the shadow and foreground layers.

use image::{GrayImage, Luma};
use imageproc::distance_transform::Norm;
use imageproc::drawing::{draw_filled_circle_mut, draw_filled_rect_mut};
use imageproc::morphology::dilate_mut;
use imageproc::rect::Rect;

const OPAQUE: Luma<u8> = Luma([255]);
const MAX_DILATE_STEP: u32 = 254;

/// Paint a filled rectangle with rounded corners into `mask`.
///
/// The radius is clamped so each corner circle fits inside the rectangle; an
/// over-large radius yields a stadium or circle rather than spilling over.
/// Pixels outside the mask bounds are clipped.
pub fn fill_rounded_rect(
    mask: &mut GrayImage,
    x: i32,
    y: i32,
    width: u32,
    height: u32,
    radius: u32,
) {
    if width == 0 || height == 0 {
        return;
    }
    let r = radius.min((width - 1) / 2).min((height - 1) / 2);
    if r == 0 {
        draw_filled_rect_mut(mask, Rect::at(x, y).of_size(width, height), OPAQUE);
        return;
    }

    let ri = r as i32;
    draw_filled_rect_mut(
        mask,
        Rect::at(x, y + ri).of_size(width, height - 2 * r),
        OPAQUE,
    );
    draw_filled_rect_mut(
        mask,
        Rect::at(x + ri, y).of_size(width - 2 * r, height),
        OPAQUE,
    );

    let left = x + ri;
    let top = y + ri;
    let right = x + width as i32 - 1 - ri;
    let bottom = y + height as i32 - 1 - ri;
    for center in [(left, top), (right, top), (left, bottom), (right, bottom)] {
        draw_filled_circle_mut(mask, center, ri, OPAQUE);
    }
}

/// Rounded-rectangle mask covering a whole `width`×`height` image.
pub fn rounded_rect_mask(width: u32, height: u32, radius: u32) -> GrayImage {
    let mut mask = GrayImage::new(width, height);
    fill_rounded_rect(&mut mask, 0, 0, width, height, radius);
    mask
}

/// Grow non-zero pixels outward by `radius` with a square kernel of span
/// `2·radius + 1`. The result is binary (0 or 255).
///
/// Chebyshev dilations compose additively, so large radii are applied in
/// steps. Each step stays below 255 because the distance transform saturates
/// there.
pub fn dilate_square(mask: &mut GrayImage, radius: u32) {
    if !mask.pixels().any(|p| p.0[0] > 0) {
        return;
    }
    let mut remaining = radius;
    while remaining > 0 {
        let step = remaining.min(MAX_DILATE_STEP);
        dilate_mut(mask, Norm::LInf, step as u8);
        remaining -= step;
    }
}
