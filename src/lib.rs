//! # Glassframe
//!
//! Frames a photograph on a frosted copy of itself. Every output is three
//! layers merged in a fixed order and cropped to a configurable canvas:
//!
//! ```text
//! ┌─────────────── canvas (margins + aspect ratio) ───────────────┐
//! │  background: the same photo, enlarged, blurred, optionally    │
//! │  tinted                                                       │
//! │         ┌──────────────────────┐                              │
//! │         │ foreground: the      │                              │
//! │         │ photo, optionally    │                              │
//! │         │ with rounded corners │▒                             │
//! │         └──────────────────────┘▒                             │
//! │          ▒▒▒▒▒▒▒▒▒▒▒▒▒▒▒▒▒▒▒▒▒▒▒▒  shadow: soft, black, offset │
//! └───────────────────────────────────────────────────────────────┘
//! ```
//!
//! The compositing core takes a decoded image plus a [`config::CompositeConfig`]
//! and returns a new RGBA image. It never reads files, never touches global
//! state, and is deterministic: the same input always yields the same bytes.
//! Loading, previewing, and exporting are thin layers around it.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`config`] | Typed `config.toml` record, pixel/percent lengths, loading, merging, validation |
//! | [`imaging`] | Geometry resolution, the three layer generators, and the single-image compositor |
//! | [`batch`] | Bounded, order-preserving parallel compositing of many images |
//! | [`scan`] | Finds and decodes input images |
//! | [`preview`] | Thumbnails and reduced-quality preview renders |
//! | [`export`] | Output naming, PNG encoding, and ZIP bundling |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Lengths Carry Their Unit
//!
//! Every distance in the config is a [`config::Length`], either pixels or a
//! percentage. Percentages are resolved exactly once, in
//! [`imaging::geometry::resolve`], against a fixed reference per field:
//! margins against the source axes, shadow spread and blur against the source
//! short side, offsets against the canvas axes. Nothing downstream ever sees a
//! percentage.
//!
//! ## Padded Working Canvas
//!
//! The shadow is painted on a canvas larger than the output by `spread + blur`
//! on every side, so its soft edge is computed in full before the final crop.
//! Without the padding, a shadow near the frame would end in a hard line.
//!
//! ## Failures Stay Local
//!
//! In a batch, one image that fails to composite (or panics) becomes `None`
//! in its slot. The other images and the order of results are unaffected.
//! Degenerate input is not a failure: a zero-area source still yields a
//! canvas, with nothing painted but the margins' background.

pub mod batch;
pub mod config;
pub mod export;
pub mod imaging;
pub mod output;
pub mod preview;
pub mod scan;

#[cfg(test)]
pub(crate) mod test_helpers;
