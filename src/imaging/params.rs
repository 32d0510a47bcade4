//! Parameter types for the layer generators.
//!
//! These structs describe *what* layer to paint, in resolved pixel units. They
//! are the interface between the [`compositor`](super::compositor) (which
//! decides what each layer needs from the configuration and geometry) and the
//! generators in [`background`](super::background) and
//! [`shadow`](super::shadow), which do the pixel work.
//!
//! ## Types
//!
//! - [`Opacity`]: Unit-interval opacity (0.0–1.0). Clamped on construction.
//! - [`MaskOpacity`]: Percent opacity (0–100) of the background color mask.
//! - [`BackgroundParams`]: Target size, enlargement, blur, and mask.
//! - [`ShadowParams`]: Silhouette size, corner radius, spread, blur, opacity, offset.

use super::geometry::Offset;
use crate::config::MaskType;

/// Opacity in the unit interval.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Opacity(f32);

impl Opacity {
    /// Clamp to `0.0..=1.0`; NaN becomes fully transparent.
    pub fn new(value: f32) -> Self {
        if value.is_nan() {
            return Self(0.0);
        }
        Self(value.clamp(0.0, 1.0))
    }

    pub fn value(self) -> f32 {
        self.0
    }
}

/// Opacity of the background color mask, in percent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaskOpacity(u8);

impl MaskOpacity {
    pub fn new(percent: u8) -> Self {
        Self(percent.min(100))
    }

    pub fn percent(self) -> u8 {
        self.0
    }

    /// 8-bit alpha for this opacity, truncated.
    pub fn alpha(self) -> u8 {
        (self.0 as f32 / 100.0 * 255.0) as u8
    }
}

/// Parameters for the frosted background layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackgroundParams {
    /// Exact output size.
    pub width: u32,
    pub height: u32,
    /// Minimum enlargement; raised as needed to cover the output.
    pub scale: f32,
    /// Gaussian blur radius in pixels; `<= 0` disables the blur.
    pub blur: f32,
    pub mask: MaskType,
    pub mask_opacity: MaskOpacity,
}

/// Parameters for the drop shadow layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadowParams {
    /// Size of the shape the shadow is cast by (the source photo).
    pub source_width: u32,
    pub source_height: u32,
    /// Exact output size.
    pub width: u32,
    pub height: u32,
    pub corner_radius: u32,
    pub spread: u32,
    pub blur: u32,
    pub opacity: Opacity,
    pub offset: Offset,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opacity_clamps_to_unit_interval() {
        assert_eq!(Opacity::new(-0.5).value(), 0.0);
        assert_eq!(Opacity::new(0.5).value(), 0.5);
        assert_eq!(Opacity::new(3.0).value(), 1.0);
        assert_eq!(Opacity::new(f32::NAN).value(), 0.0);
    }

    #[test]
    fn mask_opacity_clamps_and_converts() {
        assert_eq!(MaskOpacity::new(150).percent(), 100);
        assert_eq!(MaskOpacity::new(0).alpha(), 0);
        assert_eq!(MaskOpacity::new(40).alpha(), 102);
        assert_eq!(MaskOpacity::new(100).alpha(), 255);
    }
}
