//! Compositing configuration.
//!
//! Every knob the compositor understands lives in one typed record,
//! [`CompositeConfig`]. A user `config.toml` is sparse: it is merged on top of
//! the stock defaults, unknown keys are rejected, and the result is validated.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [background]
//! enabled = true
//! scale = 1.0               # Enlargement of the blurred copy (>= 1.0)
//! blur = 20.0               # Gaussian blur radius in pixels
//! mask = "none"             # none | white | black
//! mask_opacity = 40         # Mask opacity in percent (0-100)
//!
//! [shadow]
//! enabled = true
//! spread = { px = 16 }      # px, or pct of the source short side
//! blur = { px = 30 }        # px, or pct of the source short side
//! opacity = 0.72            # 0.0-1.0
//! offset_x = { px = 10 }    # px, or pct of the canvas width
//! offset_y = { px = 10 }    # px, or pct of the canvas height
//! link_to_foreground = true # Shadow moves with the foreground offset
//! follow_margin = true      # Asymmetric margins bias the shadow
//!
//! [foreground]
//! corner_radius_pct = 0.0   # Percent of the source short side
//! offset_x = { px = 0 }     # px, or pct of the canvas width
//! offset_y = { px = 0 }     # px, or pct of the canvas height
//!
//! [margin]
//! independent = false       # Use top/bottom/left/right instead of `all`
//! all = { px = 40 }
//! top = { px = 40 }         # pct is relative to the source height
//! bottom = { px = 40 }
//! left = { px = 40 }        # pct is relative to the source width
//! right = { px = 40 }
//!
//! [canvas]
//! # ratio = [4, 5]          # Omit to keep the margin-padded source aspect
//!
//! [batch]
//! max_workers = 4
//! ```
//!
//! ## Lengths
//!
//! Distances are [`Length`] values: `{ px = N }` for absolute pixels or
//! `{ pct = N }` for a percentage of a reference axis. Which axis a percentage
//! refers to is fixed per field (see the table above) and is resolved exactly
//! once, by [`crate::imaging::geometry::resolve`].

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// A distance in absolute pixels or as a percentage of a reference length.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Length {
    #[serde(rename = "px")]
    Pixels(i64),
    #[serde(rename = "pct")]
    Percent(f64),
}

impl Length {
    /// Convert to pixels against `reference`, truncating toward zero.
    ///
    /// ```
    /// # use glassframe::config::Length;
    /// assert_eq!(Length::Pixels(-12).resolve(500), -12);
    /// assert_eq!(Length::Percent(10.0).resolve(415), 41);
    /// assert_eq!(Length::Percent(-10.0).resolve(415), -41);
    /// ```
    pub fn resolve(self, reference: u32) -> i64 {
        match self {
            Length::Pixels(px) => px,
            Length::Percent(pct) => (pct / 100.0 * reference as f64) as i64,
        }
    }

    /// Scale pixel lengths by `factor`; percentages already follow the image.
    pub fn scaled(self, factor: f64) -> Self {
        match self {
            Length::Pixels(px) => Length::Pixels((px as f64 * factor) as i64),
            percent => percent,
        }
    }
}

/// Flat color laid over the blurred background.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaskType {
    #[default]
    None,
    White,
    Black,
}

/// Full compositing configuration.
///
/// All fields have defaults; user config files need only specify the values
/// they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CompositeConfig {
    /// Blurred "glass" backdrop.
    pub background: BackgroundConfig,
    /// Soft drop shadow under the foreground.
    pub shadow: ShadowConfig,
    /// The photo itself.
    pub foreground: ForegroundConfig,
    /// Frame around the photo.
    pub margin: MarginConfig,
    /// Output aspect ratio.
    pub canvas: CanvasConfig,
    /// Parallel batch settings.
    pub batch: BatchConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BackgroundConfig {
    pub enabled: bool,
    /// Minimum enlargement of the source before cropping; the generator
    /// enlarges further when needed to cover the canvas.
    pub scale: f32,
    /// Gaussian blur radius in pixels.
    pub blur: f32,
    pub mask: MaskType,
    /// Mask opacity in percent (0-100).
    pub mask_opacity: u8,
}

impl Default for BackgroundConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            scale: 1.0,
            blur: 20.0,
            mask: MaskType::None,
            mask_opacity: 40,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ShadowConfig {
    pub enabled: bool,
    /// Outward growth of the silhouette. Percentages refer to the source short side.
    pub spread: Length,
    /// Blur radius. Percentages refer to the source short side.
    pub blur: Length,
    /// Peak opacity, 0.0-1.0.
    pub opacity: f32,
    /// Percentages refer to the canvas width.
    pub offset_x: Length,
    /// Percentages refer to the canvas height.
    pub offset_y: Length,
    /// Add the foreground offset to the shadow offset.
    pub link_to_foreground: bool,
    /// Bias the shadow by half the left/right and top/bottom margin difference.
    pub follow_margin: bool,
}

impl Default for ShadowConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            spread: Length::Pixels(16),
            blur: Length::Pixels(30),
            opacity: 0.72,
            offset_x: Length::Pixels(10),
            offset_y: Length::Pixels(10),
            link_to_foreground: true,
            follow_margin: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ForegroundConfig {
    /// Corner radius as a percentage of the source short side.
    pub corner_radius_pct: f64,
    /// Percentages refer to the canvas width.
    pub offset_x: Length,
    /// Percentages refer to the canvas height.
    pub offset_y: Length,
}

impl Default for ForegroundConfig {
    fn default() -> Self {
        Self {
            corner_radius_pct: 0.0,
            offset_x: Length::Pixels(0),
            offset_y: Length::Pixels(0),
        }
    }
}

/// Margins around the photo.
///
/// With `independent = false` only `all` is read. Left/right percentages
/// refer to the source width, top/bottom percentages to the source height.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MarginConfig {
    pub independent: bool,
    pub all: Length,
    pub top: Length,
    pub bottom: Length,
    pub left: Length,
    pub right: Length,
}

impl Default for MarginConfig {
    fn default() -> Self {
        Self {
            independent: false,
            all: Length::Pixels(40),
            top: Length::Pixels(40),
            bottom: Length::Pixels(40),
            left: Length::Pixels(40),
            right: Length::Pixels(40),
        }
    }
}

impl MarginConfig {
    /// Same margin on every edge.
    pub fn uniform(length: Length) -> Self {
        Self {
            all: length,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CanvasConfig {
    /// Target aspect ratio as `[width, height]`. `None` keeps the
    /// margin-padded source aspect.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ratio: Option<[u32; 2]>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BatchConfig {
    /// Width of the worker pool used by [`crate::batch::process_all`].
    pub max_workers: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self { max_workers: 4 }
    }
}

impl CompositeConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let bg = &self.background;
        if !bg.scale.is_finite() || bg.scale < 0.0 {
            return Err(ConfigError::Validation(
                "background.scale must be a non-negative number".into(),
            ));
        }
        if !bg.blur.is_finite() || bg.blur < 0.0 {
            return Err(ConfigError::Validation(
                "background.blur must be a non-negative number".into(),
            ));
        }
        if bg.mask_opacity > 100 {
            return Err(ConfigError::Validation(
                "background.mask_opacity must be 0-100".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.shadow.opacity) {
            return Err(ConfigError::Validation(
                "shadow.opacity must be 0.0-1.0".into(),
            ));
        }
        for (name, length) in [
            ("shadow.spread", self.shadow.spread),
            ("shadow.blur", self.shadow.blur),
        ] {
            let negative = match length {
                Length::Pixels(px) => px < 0,
                Length::Percent(pct) => !pct.is_finite() || pct < 0.0,
            };
            if negative {
                return Err(ConfigError::Validation(format!(
                    "{name} must not be negative"
                )));
            }
        }
        if !(0.0..=100.0).contains(&self.foreground.corner_radius_pct) {
            return Err(ConfigError::Validation(
                "foreground.corner_radius_pct must be 0-100".into(),
            ));
        }
        if matches!(self.canvas.ratio, Some([w, h]) if w == 0 || h == 0) {
            return Err(ConfigError::Validation(
                "canvas.ratio values must be non-zero".into(),
            ));
        }
        if self.batch.max_workers == 0 {
            return Err(ConfigError::Validation(
                "batch.max_workers must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Copy of this config with every pixel length multiplied by `factor`.
    ///
    /// Used to render a downscaled preview that looks like the full-size
    /// output: percentages already track the image, pixel values do not.
    pub fn scaled(&self, factor: f64) -> Self {
        let mut scaled = self.clone();
        let margin = &mut scaled.margin;
        for length in [
            &mut margin.all,
            &mut margin.top,
            &mut margin.bottom,
            &mut margin.left,
            &mut margin.right,
        ] {
            *length = length.scaled(factor);
        }
        let shadow = &mut scaled.shadow;
        for length in [
            &mut shadow.spread,
            &mut shadow.blur,
            &mut shadow.offset_x,
            &mut shadow.offset_y,
        ] {
            *length = length.scaled(factor);
        }
        let fg = &mut scaled.foreground;
        fg.offset_x = fg.offset_x.scaled(factor);
        fg.offset_y = fg.offset_y.scaled(factor);
        scaled
    }
}

/// Resolve the effective worker count.
///
/// Caps at the number of available CPU cores and never returns zero. The
/// user can constrain down, not up.
pub fn effective_workers(requested: usize) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    requested.clamp(1, cores)
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the base layer user overrides are merged onto.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(CompositeConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    // A length switching unit must replace, not merge: `{ px }`
                    // and `{ pct }` in one table is not a length.
                    Some(base_val) if is_length_table(&base_val) => overlay_val,
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

fn is_length_table(value: &toml::Value) -> bool {
    value
        .as_table()
        .is_some_and(|t| t.len() == 1 && (t.contains_key("px") || t.contains_key("pct")))
}

/// Load a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
/// Returns `Err` if the file exists but contains invalid TOML.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<CompositeConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: CompositeConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from a TOML file, falling back to stock defaults if it is absent.
pub fn load_config(path: &Path) -> Result<CompositeConfig, ConfigError> {
    let overlay = load_raw_config(path)?;
    resolve_config(stock_defaults_value(), overlay)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Glassframe Configuration
# ========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys will cause an error.
#
# Lengths are written as { px = N } for pixels or { pct = N } for a
# percentage of the reference axis noted next to each key.

# ---------------------------------------------------------------------------
# Frosted-glass background
# ---------------------------------------------------------------------------
[background]
enabled = true
# Minimum enlargement of the blurred copy. It is enlarged further whenever
# that is needed to cover the whole canvas.
scale = 1.0
# Gaussian blur radius in pixels.
blur = 20.0
# Flat color laid over the blur: "none", "white" or "black".
mask = "none"
# Mask opacity in percent (0-100). Ignored when mask = "none".
mask_opacity = 40

# ---------------------------------------------------------------------------
# Drop shadow
# ---------------------------------------------------------------------------
[shadow]
enabled = true
# Outward growth of the shadow silhouette (pct: of the photo's short side).
spread = { px = 16 }
# Shadow edge softness (pct: of the photo's short side).
blur = { px = 30 }
# Peak shadow opacity, 0.0-1.0.
opacity = 0.72
# Shadow offset; positive moves right/down (pct: of the canvas width/height).
offset_x = { px = 10 }
offset_y = { px = 10 }
# Move the shadow together with the foreground offset.
link_to_foreground = true
# Shift the shadow by half the left/right and top/bottom margin difference,
# as if the light reacted to an asymmetric frame.
follow_margin = true

# ---------------------------------------------------------------------------
# Foreground photo
# ---------------------------------------------------------------------------
[foreground]
# Corner radius as a percentage of the photo's short side.
corner_radius_pct = 0.0
# Foreground offset; positive moves right/down (pct: of the canvas width/height).
offset_x = { px = 0 }
offset_y = { px = 0 }

# ---------------------------------------------------------------------------
# Margins
# ---------------------------------------------------------------------------
[margin]
# false: `all` applies to every edge. true: use top/bottom/left/right.
independent = false
all = { px = 40 }
# pct: top/bottom of the photo height, left/right of the photo width.
top = { px = 40 }
bottom = { px = 40 }
left = { px = 40 }
right = { px = 40 }

# ---------------------------------------------------------------------------
# Canvas
# ---------------------------------------------------------------------------
[canvas]
# Output aspect ratio as [width, height], e.g. [4, 5] or [9, 16].
# Omit to keep the photo's aspect (plus margins).
# ratio = [4, 5]

# ---------------------------------------------------------------------------
# Batch processing
# ---------------------------------------------------------------------------
[batch]
# Maximum parallel image workers.
max_workers = 4
"##
}
