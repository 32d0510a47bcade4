//! Frosted-glass background layer.
//!
//! The source is flattened to RGB, enlarged until it covers the target in both
//! axes, center-cropped to the exact target size, blurred, and optionally
//! tinted with a translucent white or black mask. The result is always fully
//! opaque, so source transparency never shows through as holes.

use super::params::BackgroundParams;
use crate::config::MaskType;
use image::imageops::{self, FilterType};
use image::{DynamicImage, Rgb, RgbImage, RgbaImage};
use tracing::debug;

/// Float noise allowed when turning a scaled extent into whole pixels, so
/// `440.0000000001` does not round up to 441.
const COVER_EPSILON: f64 = 1e-6;

/// Generate the background layer described by `params`.
///
/// Never fails: a zero target size yields a 1×1 transparent image, and an
/// empty source yields a transparent image of the target size.
pub fn create_background(source: &DynamicImage, params: &BackgroundParams) -> RgbaImage {
    let (out_w, out_h) = (params.width, params.height);
    if out_w == 0 || out_h == 0 {
        return RgbaImage::new(1, 1);
    }

    let base = source.to_rgb8();
    let (src_w, src_h) = base.dimensions();
    if src_w == 0 || src_h == 0 {
        return RgbaImage::new(out_w, out_h);
    }

    let (enlarged_w, enlarged_h) = cover_dimensions((src_w, src_h), (out_w, out_h), params.scale);
    debug!(
        src_w,
        src_h, out_w, out_h, enlarged_w, enlarged_h, "Generating background"
    );

    let enlarged = if (enlarged_w, enlarged_h) == (src_w, src_h) {
        base
    } else {
        imageops::resize(&base, enlarged_w, enlarged_h, FilterType::Lanczos3)
    };

    let x = (enlarged_w - out_w) / 2;
    let y = (enlarged_h - out_h) / 2;
    let cropped = imageops::crop_imm(&enlarged, x, y, out_w, out_h).to_image();

    let mut blurred = if params.blur > 0.0 {
        imageops::blur(&cropped, params.blur)
    } else {
        cropped
    };

    match params.mask {
        MaskType::None => {}
        MaskType::White => tint(&mut blurred, Rgb([255, 255, 255]), params.mask_opacity.alpha()),
        MaskType::Black => tint(&mut blurred, Rgb([0, 0, 0]), params.mask_opacity.alpha()),
    }

    DynamicImage::ImageRgb8(blurred).to_rgba8()
}

/// Size of the enlarged source: at least `scale` times the source, and at
/// least as large as the target in both axes.
///
/// # Examples
/// ```
/// # use glassframe::imaging::background::cover_dimensions;
/// // 400x300 must cover 440x360: 1.2x is needed
/// assert_eq!(cover_dimensions((400, 300), (440, 360), 1.0), (480, 360));
/// // a larger user scale wins
/// assert_eq!(cover_dimensions((400, 300), (440, 360), 1.5), (600, 450));
/// ```
pub fn cover_dimensions(source: (u32, u32), target: (u32, u32), scale: f32) -> (u32, u32) {
    let (src_w, src_h) = (source.0.max(1) as f64, source.1.max(1) as f64);
    let needed = (target.0 as f64 / src_w).max(target.1 as f64 / src_h);
    let user = if scale.is_finite() { scale as f64 } else { 1.0 };
    let scale = user.max(needed);

    let w = (src_w * scale - COVER_EPSILON).ceil() as u32;
    let h = (src_h * scale - COVER_EPSILON).ceil() as u32;
    (w.max(target.0), h.max(target.1))
}

/// Source-over of a flat color at `alpha` onto an opaque image.
fn tint(image: &mut RgbImage, color: Rgb<u8>, alpha: u8) {
    if alpha == 0 {
        return;
    }
    let a = alpha as u32;
    for pixel in image.pixels_mut() {
        for (channel, &c) in pixel.0.iter_mut().zip(color.0.iter()) {
            *channel = ((*channel as u32 * (255 - a) + c as u32 * a + 127) / 255) as u8;
        }
    }
}
