//! Layer generation and compositing, built on `image` and `imageproc`.
//!
//! | Layer | Function | Built with |
//! |---|---|---|
//! | **Background** | [`create_background`] | Lanczos3 resize, center crop, Gaussian blur, flat tint |
//! | **Shadow** | [`create_shadow`] | rounded-rect mask, square dilation, Gaussian blur, squared falloff |
//! | **Foreground** | [`apply_round_corners`] | rounded-rect alpha intersection |
//! | **Merge** | [`process`] | source-over in fixed order, crop to canvas |
//!
//! The module is split into:
//! - **Geometry**: Pure functions for canvas, padding, and offset math (unit testable)
//! - **Parameters**: Data structures describing each layer
//! - **Shapes**: Mask rasterization shared by shadow and foreground
//! - **Generators**: One module per layer
//! - **Compositor**: [`Compositor`] trait + [`LayerCompositor`]

pub mod background;
pub mod compositor;
pub mod foreground;
pub mod geometry;
pub mod params;
mod shapes;
pub mod shadow;

pub use background::create_background;
pub use compositor::{CompositeError, Compositor, LayerCompositor, process};
pub use foreground::apply_round_corners;
pub use geometry::{CanvasGeometry, Edges, Geometry, Offset};
pub use params::{BackgroundParams, MaskOpacity, Opacity, ShadowParams};
pub use shadow::create_shadow;
