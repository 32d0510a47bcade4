//! Drop shadow layer.
//!
//! The silhouette of the source (a rectangle, rounded when the foreground is)
//! is painted centered in the output, grown by `spread`, blurred, and passed
//! through a squared falloff before becoming the alpha of a black layer.

use super::params::ShadowParams;
use super::shapes::{dilate_square, fill_rounded_rect};
use image::imageops;
use image::{GrayImage, Rgba, RgbaImage};
use tracing::debug;

/// Generate the shadow layer described by `params`.
pub fn create_shadow(params: &ShadowParams) -> RgbaImage {
    let (out_w, out_h) = (params.width, params.height);
    if out_w == 0 || out_h == 0 {
        return RgbaImage::new(out_w, out_h);
    }
    debug!(
        out_w,
        out_h,
        spread = params.spread,
        blur = params.blur,
        "Generating shadow"
    );

    let mut mask = GrayImage::new(out_w, out_h);
    let x = centered(out_w, params.source_width);
    let y = centered(out_h, params.source_height);
    fill_rounded_rect(
        &mut mask,
        x,
        y,
        params.source_width,
        params.source_height,
        params.corner_radius,
    );

    dilate_square(&mut mask, params.spread);
    if params.blur > 0 {
        mask = imageops::blur(&mask, params.blur as f32);
    }

    let falloff = falloff_table(params.opacity.value());
    let layer = RgbaImage::from_fn(out_w, out_h, |x, y| {
        Rgba([0, 0, 0, falloff[mask.get_pixel(x, y).0[0] as usize]])
    });

    let offset = params.offset;
    if offset.x == 0 && offset.y == 0 {
        return layer;
    }
    let mut shifted = RgbaImage::new(out_w, out_h);
    imageops::replace(&mut shifted, &layer, offset.x, offset.y);
    shifted
}

/// Alpha for every mask value: `clamp((v / 255)² · opacity) · 255`, truncated.
fn falloff_table(opacity: f32) -> [u8; 256] {
    let mut table = [0u8; 256];
    for (value, alpha) in table.iter_mut().enumerate() {
        let unit = value as f32 / 255.0;
        *alpha = ((unit * unit * opacity).clamp(0.0, 1.0) * 255.0) as u8;
    }
    table
}

fn centered(outer: u32, inner: u32) -> i32 {
    (outer as i64 - inner as i64)
        .div_euclid(2)
        .clamp(i32::MIN as i64, i32::MAX as i64) as i32
}
