//! Canvas and offset resolution.
//!
//! Turns a source size plus a [`CompositeConfig`] into every pixel quantity
//! the layer generators need. All functions here are pure and testable without
//! any images.
//!
//! ## Coordinate model
//!
//! ```text
//! ┌──────────────── full_w = canvas_w + 2·pad ────────────────┐
//! │ pad                                                        │
//! │   ┌──────────────── canvas_w ─────────────────┐            │
//! │   │ (base_x, base_y)                          │            │
//! │   │      ┌───────────────┐                    │            │
//! │   │      │   source      │                    │            │
//! │   │      └───────────────┘                    │            │
//! │   └───────────────────────────────────────────┘            │
//! └────────────────────────────────────────────────────────────┘
//! ```
//!
//! Percentages are resolved against a fixed axis per field: margins against
//! the source width (left/right) or height (top/bottom), shadow spread and
//! blur against the source short side, every offset against the canvas
//! width or height.

use crate::config::{CompositeConfig, Length, MarginConfig};
use serde::Serialize;

/// Per-edge pixel margins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Edges {
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
    pub left: u32,
}

/// Canvas size, unshifted foreground origin, and shadow safety padding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CanvasGeometry {
    /// Margin-and-ratio-adjusted frame size.
    pub canvas_w: u32,
    pub canvas_h: u32,
    /// Top-left of the foreground inside the canvas, before any offset.
    pub base_x: u32,
    pub base_y: u32,
    /// Transparent border added on all four sides so the shadow is not clipped.
    pub pad: u32,
}

impl CanvasGeometry {
    pub fn full_w(&self) -> u32 {
        self.canvas_w.saturating_add(self.pad.saturating_mul(2))
    }

    pub fn full_h(&self) -> u32 {
        self.canvas_h.saturating_add(self.pad.saturating_mul(2))
    }
}

/// Signed pixel offset; positive moves right/down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Offset {
    pub x: i64,
    pub y: i64,
}

impl Offset {
    /// Component-wise sum, saturating at the `i64` range.
    pub fn saturating_add(self, other: Offset) -> Offset {
        Offset {
            x: self.x.saturating_add(other.x),
            y: self.y.saturating_add(other.y),
        }
    }
}

/// Everything [`resolve`] derives for one image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Geometry {
    pub canvas: CanvasGeometry,
    pub margins: Edges,
    pub foreground_offset: Offset,
    /// Final shadow offset, link and follow-margin already applied.
    pub shadow_offset: Offset,
    pub shadow_spread: u32,
    pub shadow_blur: u32,
}

/// Resolve the full geometry for a source of `source = (width, height)`.
///
/// Never fails: degenerate inputs (zero-area source, zero ratio terms) fall
/// back to a divisor of 1 and the canvas is clamped to at least 1×1.
///
/// # Examples
/// ```
/// # use glassframe::config::{CompositeConfig, Length, MarginConfig};
/// # use glassframe::imaging::geometry::resolve;
/// let mut config = CompositeConfig::default();
/// config.margin = MarginConfig::uniform(Length::Pixels(20));
/// config.shadow.enabled = false;
///
/// let geometry = resolve((400, 300), &config);
/// assert_eq!((geometry.canvas.canvas_w, geometry.canvas.canvas_h), (440, 360));
/// assert_eq!((geometry.canvas.base_x, geometry.canvas.base_y), (20, 20));
/// assert_eq!(geometry.canvas.pad, 0);
/// ```
pub fn resolve(source: (u32, u32), config: &CompositeConfig) -> Geometry {
    let margins = resolve_margins(source, &config.margin);
    let (canvas_w, canvas_h, base_x, base_y) = fit_canvas(source, margins, config.canvas.ratio);

    let short_side = source.0.min(source.1);
    let shadow_spread = to_pixels(config.shadow.spread.resolve(short_side));
    let shadow_blur = to_pixels(config.shadow.blur.resolve(short_side));
    let pad = if config.shadow.enabled {
        shadow_spread.saturating_add(shadow_blur)
    } else {
        0
    };

    let foreground_offset = resolve_offset(
        config.foreground.offset_x,
        config.foreground.offset_y,
        (canvas_w, canvas_h),
    );
    let mut shadow_offset = resolve_offset(
        config.shadow.offset_x,
        config.shadow.offset_y,
        (canvas_w, canvas_h),
    );
    if config.shadow.link_to_foreground {
        shadow_offset = shadow_offset.saturating_add(foreground_offset);
    }
    if config.shadow.follow_margin {
        shadow_offset = shadow_offset.saturating_add(margin_bias(margins));
    }

    Geometry {
        canvas: CanvasGeometry {
            canvas_w,
            canvas_h,
            base_x,
            base_y,
            pad,
        },
        margins,
        foreground_offset,
        shadow_offset,
        shadow_spread,
        shadow_blur,
    }
}

/// Resolve the four margins to pixels.
///
/// Left/right percentages refer to the source width, top/bottom to the
/// source height. Negative lengths clamp to zero.
pub fn resolve_margins(source: (u32, u32), margin: &MarginConfig) -> Edges {
    let (src_w, src_h) = source;
    let pick = |edge: Length| if margin.independent { edge } else { margin.all };

    Edges {
        top: to_pixels(pick(margin.top).resolve(src_h)),
        right: to_pixels(pick(margin.right).resolve(src_w)),
        bottom: to_pixels(pick(margin.bottom).resolve(src_h)),
        left: to_pixels(pick(margin.left).resolve(src_w)),
    }
}

/// Grow the margin-padded frame to the target ratio.
///
/// Returns `(canvas_w, canvas_h, base_x, base_y)`. A frame that is too wide
/// keeps its width and grows in height, with the excess split around the
/// original vertical span; a frame that is too tall grows in width the same
/// way. The comparison is done in integers so the result is exact.
///
/// # Examples
/// ```
/// # use glassframe::imaging::geometry::{Edges, fit_canvas};
/// let margins = Edges { top: 20, right: 20, bottom: 20, left: 20 };
/// // 440x360 frame fitted to 4:5 → height grows to 550
/// assert_eq!(fit_canvas((400, 300), margins, Some([4, 5])), (440, 550, 20, 115));
/// ```
pub fn fit_canvas(
    source: (u32, u32),
    margins: Edges,
    ratio: Option<[u32; 2]>,
) -> (u32, u32, u32, u32) {
    // u128 holds every product of a summed u32 extent and a u32 ratio term
    let base_w = source.0 as u128 + margins.left as u128 + margins.right as u128;
    let base_h = source.1 as u128 + margins.top as u128 + margins.bottom as u128;
    let (mut base_x, mut base_y) = (margins.left as u128, margins.top as u128);

    let (canvas_w, canvas_h) = match ratio {
        None => (base_w, base_h),
        Some([rw, rh]) => {
            let rw = non_zero(rw);
            let rh = non_zero(rh);
            let lhs = base_w * rh;
            let rhs = rw * base_h;
            if lhs > rhs {
                // Too wide: hold width, grow height
                let new_h = (lhs / rw).max(base_h);
                base_y += (new_h - base_h) / 2;
                (base_w, new_h)
            } else if lhs < rhs {
                // Too tall: hold height, grow width
                let new_w = (rhs / rh).max(base_w);
                base_x += (new_w - base_w) / 2;
                (new_w, base_h)
            } else {
                (base_w, base_h)
            }
        }
    };

    (
        clamp_extent(canvas_w),
        clamp_extent(canvas_h),
        clamp_u32(base_x),
        clamp_u32(base_y),
    )
}

/// Shadow bias for asymmetric framing: half the left/right and top/bottom
/// difference, floored.
pub fn margin_bias(margins: Edges) -> Offset {
    Offset {
        x: (margins.left as i64 - margins.right as i64).div_euclid(2),
        y: (margins.top as i64 - margins.bottom as i64).div_euclid(2),
    }
}

/// Corner radius in pixels for a percentage of the source short side.
///
/// Rounds half to even and clamps to half the short side so the shape never
/// degenerates beyond a circle.
///
/// # Examples
/// ```
/// # use glassframe::imaging::geometry::corner_radius_px;
/// assert_eq!(corner_radius_px(10.0, (400, 300)), 30);
/// assert_eq!(corner_radius_px(80.0, (400, 300)), 150);
/// ```
pub fn corner_radius_px(pct: f64, source: (u32, u32)) -> u32 {
    let short_side = source.0.min(source.1);
    let radius = (pct / 100.0 * short_side as f64).round_ties_even();
    to_pixels(radius as i64).min(short_side / 2)
}

fn resolve_offset(x: Length, y: Length, canvas: (u32, u32)) -> Offset {
    Offset {
        x: x.resolve(canvas.0),
        y: y.resolve(canvas.1),
    }
}

fn non_zero(value: u32) -> u128 {
    value.max(1) as u128
}

fn to_pixels(value: i64) -> u32 {
    value.clamp(0, u32::MAX as i64) as u32
}

fn clamp_u32(value: u128) -> u32 {
    value.min(u32::MAX as u128) as u32
}

fn clamp_extent(value: u128) -> u32 {
    clamp_u32(value).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_margin(px: i64) -> CompositeConfig {
        let mut config = CompositeConfig::default();
        config.margin = MarginConfig::uniform(Length::Pixels(px));
        config
    }

    fn set_edge(config: &mut CompositeConfig, edge: usize, length: Length) {
        match edge {
            0 => config.margin.top = length,
            1 => config.margin.right = length,
            2 => config.margin.bottom = length,
            _ => config.margin.left = length,
        }
    }

    // =========================================================================
    // Margins
    // =========================================================================

    #[test]
    fn uniform_margin_applies_to_all_edges() {
        let mut config = config_with_margin(25);
        // per-edge values are ignored while `independent` is off
        config.margin.left = Length::Pixels(999);
        let m = resolve_margins((400, 300), &config.margin);
        assert_eq!(
            m,
            Edges {
                top: 25,
                right: 25,
                bottom: 25,
                left: 25
            }
        );
    }

    #[test]
    fn independent_percent_margins_use_source_axes() {
        let mut config = CompositeConfig::default();
        config.margin.independent = true;
        config.margin.top = Length::Percent(10.0);
        config.margin.bottom = Length::Percent(5.0);
        config.margin.left = Length::Percent(10.0);
        config.margin.right = Length::Percent(2.5);

        let m = resolve_margins((415, 333), &config.margin);
        assert_eq!(m.top, 33); // 33.3 truncated
        assert_eq!(m.bottom, 16); // 16.65 truncated
        assert_eq!(m.left, 41); // 41.5 truncated
        assert_eq!(m.right, 10); // 10.375 truncated
    }

    #[test]
    fn uniform_percent_margin_uses_each_axis() {
        let config = {
            let mut c = CompositeConfig::default();
            c.margin = MarginConfig::uniform(Length::Percent(10.0));
            c
        };
        let m = resolve_margins((400, 300), &config.margin);
        assert_eq!((m.left, m.right), (40, 40));
        assert_eq!((m.top, m.bottom), (30, 30));
    }

    #[test]
    fn negative_margin_clamps_to_zero() {
        let config = config_with_margin(-10);
        let m = resolve_margins((400, 300), &config.margin);
        assert_eq!(m, Edges::default());
    }

    // =========================================================================
    // Canvas fitting
    // =========================================================================

    #[test]
    fn no_ratio_canvas_is_margin_padded_frame() {
        let mut config = config_with_margin(20);
        config.shadow.enabled = false;
        let g = resolve((400, 300), &config);
        assert_eq!(g.canvas.canvas_w, 440);
        assert_eq!(g.canvas.canvas_h, 360);
        assert_eq!((g.canvas.base_x, g.canvas.base_y), (20, 20));
    }

    #[test]
    fn canvas_grows_by_exactly_the_margin_delta() {
        for edge in 0..4 {
            for delta in [1, 7, 50] {
                let mut config = CompositeConfig::default();
                config.margin.independent = true;
                let before = resolve((400, 300), &config).canvas;

                set_edge(&mut config, edge, Length::Pixels(40 + delta));
                let after = resolve((400, 300), &config).canvas;

                let horizontal = edge == 1 || edge == 3;
                let (dw, dh) = if horizontal {
                    (delta as u32, 0)
                } else {
                    (0, delta as u32)
                };
                assert_eq!(after.canvas_w, before.canvas_w + dw, "edge {edge}");
                assert_eq!(after.canvas_h, before.canvas_h + dh, "edge {edge}");
            }
        }
    }

    #[test]
    fn ratio_too_wide_grows_height_centered() {
        let margins = Edges {
            top: 20,
            right: 20,
            bottom: 20,
            left: 20,
        };
        // 440x360 → 4:5 → 440x550, excess 190 split around the original span
        assert_eq!(
            fit_canvas((400, 300), margins, Some([4, 5])),
            (440, 550, 20, 115)
        );
    }

    #[test]
    fn ratio_too_tall_grows_width_centered() {
        // 300x400 → 16:9 → 711x400
        assert_eq!(
            fit_canvas((300, 400), Edges::default(), Some([16, 9])),
            (711, 400, 205, 0)
        );
    }

    #[test]
    fn ratio_already_matching_is_unchanged() {
        assert_eq!(
            fit_canvas((400, 500), Edges::default(), Some([4, 5])),
            (400, 500, 0, 0)
        );
    }

    #[test]
    fn ratio_is_enforced_within_one_pixel() {
        let sizes = [(400, 300), (300, 400), (1, 1), (1920, 1080), (333, 777)];
        let ratios = [[4, 5], [9, 16], [16, 9], [1, 1], [3, 2], [7, 3]];
        for source in sizes {
            for [rw, rh] in ratios {
                let mut config = config_with_margin(17);
                config.canvas.ratio = Some([rw, rh]);
                let c = resolve(source, &config).canvas;
                let lhs = c.canvas_w as u64 * rh as u64;
                let rhs = c.canvas_h as u64 * rw as u64;
                assert!(
                    lhs.abs_diff(rhs) < rw.max(rh) as u64,
                    "{source:?} at {rw}:{rh} gave {}x{}",
                    c.canvas_w,
                    c.canvas_h
                );
            }
        }
    }

    #[test]
    fn zero_area_source_clamps_to_one_pixel() {
        let mut config = config_with_margin(0);
        config.shadow.enabled = false;
        let g = resolve((0, 0), &config);
        assert_eq!((g.canvas.canvas_w, g.canvas.canvas_h), (1, 1));
    }

    #[test]
    fn zero_ratio_terms_do_not_panic() {
        for ratio in [[0, 0], [4, 0], [0, 5]] {
            let mut config = config_with_margin(10);
            config.canvas.ratio = Some(ratio);
            let g = resolve((400, 300), &config);
            assert!(g.canvas.canvas_w >= 420);
            assert!(g.canvas.canvas_h >= 320);
        }
    }

    #[test]
    fn zero_ratio_denominator_is_treated_as_one() {
        // 4:0 behaves as 4:1 → 420x320 is too tall, width grows to 1280
        let (w, h, _, _) = fit_canvas(
            (400, 300),
            Edges {
                top: 10,
                right: 10,
                bottom: 10,
                left: 10,
            },
            Some([4, 0]),
        );
        assert_eq!((w, h), (1280, 320));
    }

    #[test]
    fn huge_margins_and_ratio_terms_saturate() {
        let mut config = config_with_margin(4_000_000_000);
        config.canvas.ratio = Some([1, 4_000_000_000]);
        let g = resolve((400, 300), &config);
        assert_eq!(g.canvas.canvas_h, u32::MAX);
        assert!(g.canvas.canvas_w >= 1);

        config.canvas.ratio = Some([u32::MAX, 1]);
        let g = resolve((u32::MAX, u32::MAX), &config);
        assert_eq!(g.canvas.canvas_w, u32::MAX);
        assert_eq!(g.canvas.full_w(), u32::MAX);
    }

    // =========================================================================
    // Padding
    // =========================================================================

    #[test]
    fn pad_is_spread_plus_blur() {
        let g = resolve((400, 300), &CompositeConfig::default());
        assert_eq!(g.canvas.pad, 16 + 30);
    }

    #[test]
    fn pad_percent_uses_source_short_side() {
        let mut config = CompositeConfig::default();
        config.shadow.spread = Length::Percent(5.0);
        config.shadow.blur = Length::Percent(5.0);
        let g = resolve((400, 300), &config);
        assert_eq!((g.shadow_spread, g.shadow_blur), (15, 15));
        assert_eq!(g.canvas.pad, 30);
    }

    #[test]
    fn pad_is_zero_without_shadow() {
        let mut config = CompositeConfig::default();
        config.shadow.enabled = false;
        assert_eq!(resolve((400, 300), &config).canvas.pad, 0);
    }

    #[test]
    fn padding_is_symmetric() {
        let mut config = CompositeConfig::default();
        for enabled in [true, false] {
            for ratio in [None, Some([4, 5]), Some([16, 9])] {
                config.shadow.enabled = enabled;
                config.canvas.ratio = ratio;
                let c = resolve((640, 480), &config).canvas;
                assert_eq!(c.full_w() - c.canvas_w, 2 * c.pad);
                assert_eq!(c.full_h() - c.canvas_h, 2 * c.pad);
                if !enabled {
                    assert_eq!(c.pad, 0);
                }
            }
        }
    }

    // =========================================================================
    // Offsets
    // =========================================================================

    #[test]
    fn foreground_percent_offset_uses_canvas_axes() {
        let mut config = config_with_margin(20);
        config.foreground.offset_x = Length::Percent(10.0);
        config.foreground.offset_y = Length::Percent(-10.0);
        let g = resolve((400, 300), &config);
        // canvas is 440x360
        assert_eq!(g.foreground_offset, Offset { x: 44, y: -36 });
    }

    #[test]
    fn shadow_percent_offset_uses_canvas_not_source() {
        let mut config = config_with_margin(20);
        config.shadow.offset_x = Length::Percent(10.0);
        config.shadow.offset_y = Length::Percent(10.0);
        config.shadow.link_to_foreground = false;
        config.shadow.follow_margin = false;
        let g = resolve((400, 300), &config);
        assert_eq!(g.shadow_offset, Offset { x: 44, y: 36 });
    }

    #[test]
    fn linked_shadow_adds_foreground_offset() {
        let mut config = CompositeConfig::default();
        config.foreground.offset_x = Length::Pixels(-30);
        config.foreground.offset_y = Length::Pixels(5);
        config.shadow.follow_margin = false;

        let linked = resolve((400, 300), &config);
        assert_eq!(linked.shadow_offset, Offset { x: -20, y: 15 });

        config.shadow.link_to_foreground = false;
        let unlinked = resolve((400, 300), &config);
        assert_eq!(unlinked.shadow_offset, Offset { x: 10, y: 10 });
    }

    #[test]
    fn follow_margin_biases_by_floored_half_difference() {
        let mut config = CompositeConfig::default();
        config.margin.independent = true;
        config.margin.left = Length::Pixels(60);
        config.margin.right = Length::Pixels(20);
        config.margin.top = Length::Pixels(10);
        config.margin.bottom = Length::Pixels(31);
        config.shadow.offset_x = Length::Pixels(0);
        config.shadow.offset_y = Length::Pixels(0);

        let g = resolve((400, 300), &config);
        // (60-20)/2 = 20, (10-31)/2 = -10.5 floored to -11
        assert_eq!(g.shadow_offset, Offset { x: 20, y: -11 });
    }

    #[test]
    fn extreme_offsets_saturate() {
        let mut config = config_with_margin(0);
        config.margin.independent = true;
        config.margin.left = Length::Pixels(4_000_000_000);
        config.foreground.offset_x = Length::Pixels(i64::MAX);
        config.foreground.offset_y = Length::Pixels(i64::MIN);
        config.shadow.offset_x = Length::Pixels(i64::MAX);
        config.shadow.offset_y = Length::Pixels(i64::MIN);

        let g = resolve((400, 300), &config);
        assert_eq!(g.shadow_offset, Offset { x: i64::MAX, y: i64::MIN });
    }

    #[test]
    fn symmetric_margins_have_no_bias() {
        let g = resolve((400, 300), &config_with_margin(40));
        assert_eq!(g.shadow_offset, Offset { x: 10, y: 10 });
    }

    // =========================================================================
    // Corner radius
    // =========================================================================

    #[test]
    fn corner_radius_rounds_half_to_even() {
        // 12.5% of 100 = 12.5 → 12
        assert_eq!(corner_radius_px(12.5, (100, 200)), 12);
        // 13.5% of 100 = 13.5 → 14
        assert_eq!(corner_radius_px(13.5, (100, 200)), 14);
    }

    #[test]
    fn corner_radius_clamps_to_half_short_side() {
        assert_eq!(corner_radius_px(100.0, (400, 300)), 150);
        assert_eq!(corner_radius_px(0.0, (400, 300)), 0);
    }
}
