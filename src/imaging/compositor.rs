//! Single-image compositing pipeline.
//!
//! [`process`] resolves the geometry, paints the three layers onto a padded
//! working canvas in fixed order (background, shadow, foreground), and crops
//! the padding away again:
//!
//! ```text
//! source ──▶ geometry::resolve ──┬──▶ background ──┐
//!                                ├──▶ shadow ──────┼──▶ source-over ──▶ crop
//!                                └──▶ foreground ──┘
//! ```
//!
//! The [`Compositor`] trait is the seam the batch executor is generic over, so
//! batch scheduling can be tested with a mock instead of real pixel work.

use super::background::create_background;
use super::foreground::apply_round_corners;
use super::geometry::{self, corner_radius_px};
use super::params::{BackgroundParams, MaskOpacity, Opacity, ShadowParams};
use super::shadow::create_shadow;
use crate::config::CompositeConfig;
use image::imageops;
use image::{DynamicImage, GenericImageView, RgbaImage};
use thiserror::Error;
use tracing::debug;

/// Largest padded working canvas, per side.
pub const MAX_CANVAS_EXTENT: u32 = 16_384;

#[derive(Error, Debug)]
pub enum CompositeError {
    #[error("working canvas {width}x{height} exceeds {MAX_CANVAS_EXTENT}x{MAX_CANVAS_EXTENT}")]
    CanvasTooLarge { width: u32, height: u32 },
}

/// Turns one source image into one composited output.
pub trait Compositor: Sync {
    fn composite(
        &self,
        image: &DynamicImage,
        config: &CompositeConfig,
    ) -> Result<RgbaImage, CompositeError>;
}

/// The production compositor: runs [`process`].
#[derive(Debug, Clone, Copy, Default)]
pub struct LayerCompositor;

impl Compositor for LayerCompositor {
    fn composite(
        &self,
        image: &DynamicImage,
        config: &CompositeConfig,
    ) -> Result<RgbaImage, CompositeError> {
        process(image, config)
    }
}

/// Composite `image` according to `config`.
///
/// The output is exactly `canvas_w`×`canvas_h` of the resolved geometry.
/// Only an oversized working canvas is an error. Degenerate geometry, a
/// zero-area source included, is clamped instead: such a source yields a
/// canvas of at least 1×1 with no shadow or foreground painted.
pub fn process(
    image: &DynamicImage,
    config: &CompositeConfig,
) -> Result<RgbaImage, CompositeError> {
    let (src_w, src_h) = image.dimensions();
    let geometry = geometry::resolve((src_w, src_h), config);
    let canvas = geometry.canvas;
    let (full_w, full_h) = (canvas.full_w(), canvas.full_h());
    if full_w > MAX_CANVAS_EXTENT || full_h > MAX_CANVAS_EXTENT {
        return Err(CompositeError::CanvasTooLarge {
            width: full_w,
            height: full_h,
        });
    }
    debug!(
        src_w,
        src_h,
        canvas_w = canvas.canvas_w,
        canvas_h = canvas.canvas_h,
        pad = canvas.pad,
        "Compositing image"
    );

    let mut merged = RgbaImage::new(full_w, full_h);
    let pad = canvas.pad as i64;

    if config.background.enabled {
        let background = create_background(
            image,
            &BackgroundParams {
                width: canvas.canvas_w,
                height: canvas.canvas_h,
                scale: config.background.scale,
                blur: config.background.blur,
                mask: config.background.mask,
                mask_opacity: MaskOpacity::new(config.background.mask_opacity),
            },
        );
        // first layer over a transparent canvas: a plain copy
        imageops::replace(&mut merged, &background, pad, pad);
    }

    let radius = corner_radius_px(config.foreground.corner_radius_pct, (src_w, src_h));

    if config.shadow.enabled {
        let shadow = create_shadow(&ShadowParams {
            source_width: src_w,
            source_height: src_h,
            width: full_w,
            height: full_h,
            corner_radius: radius,
            spread: geometry.shadow_spread,
            blur: geometry.shadow_blur,
            opacity: Opacity::new(config.shadow.opacity),
            offset: geometry.shadow_offset,
        });
        source_over(&mut merged, &shadow, 0, 0);
    }

    let foreground = apply_round_corners(image, radius);
    let fg_x = (pad + canvas.base_x as i64).saturating_add(geometry.foreground_offset.x);
    let fg_y = (pad + canvas.base_y as i64).saturating_add(geometry.foreground_offset.y);
    source_over(&mut merged, &foreground, fg_x, fg_y);

    Ok(crop_to_canvas(&merged, canvas.pad, canvas.canvas_w, canvas.canvas_h))
}

/// Paint `top` over `bottom` with its top-left at `(x, y)`, clipped to
/// `bottom`. Straight-alpha source-over in integer arithmetic, so an opaque
/// pixel stays exactly 255 whatever is painted on it.
fn source_over(bottom: &mut RgbaImage, top: &RgbaImage, x: i64, y: i64) {
    let (bottom_w, bottom_h) = bottom.dimensions();
    let (top_w, top_h) = top.dimensions();
    let x0 = x.max(0);
    let y0 = y.max(0);
    let x1 = x.saturating_add(top_w as i64).min(bottom_w as i64);
    let y1 = y.saturating_add(top_h as i64).min(bottom_h as i64);

    for by in y0..y1 {
        for bx in x0..x1 {
            let src = top.get_pixel((bx - x) as u32, (by - y) as u32).0;
            let dst = &mut bottom.get_pixel_mut(bx as u32, by as u32).0;
            let src_a = src[3] as u32;
            match src_a {
                0 => continue,
                255 => {
                    *dst = src;
                    continue;
                }
                _ => {}
            }
            // weights scaled by 255²
            let w_src = src_a * 255;
            let w_dst = dst[3] as u32 * (255 - src_a);
            let total = w_src + w_dst;
            for (d, &s) in dst[..3].iter_mut().zip(&src[..3]) {
                *d = ((s as u32 * w_src + *d as u32 * w_dst + total / 2) / total) as u8;
            }
            dst[3] = ((total + 127) / 255) as u8;
        }
    }
}

/// Cut `(pad, pad, pad + width, pad + height)` out of `merged`, clamped to its
/// bounds. An empty rectangle yields a transparent image of the canvas size.
fn crop_to_canvas(merged: &RgbaImage, pad: u32, width: u32, height: u32) -> RgbaImage {
    let (full_w, full_h) = merged.dimensions();
    let right = (pad as u64 + width as u64).min(full_w as u64);
    let bottom = (pad as u64 + height as u64).min(full_h as u64);
    if right <= pad as u64 || bottom <= pad as u64 {
        return RgbaImage::new(width.max(1), height.max(1));
    }
    imageops::crop_imm(
        merged,
        pad,
        pad,
        (right - pad as u64) as u32,
        (bottom - pad as u64) as u32,
    )
    .to_image()
}
