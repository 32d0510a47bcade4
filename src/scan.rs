//! Input discovery and decoding.
//!
//! Finds the photos to composite and decodes them into memory. Discovery is
//! a flat listing of one directory (optionally recursive) filtered by
//! extension; decoding is best-effort, so one unreadable file does not stop
//! the rest from loading.
//!
//! ```text
//! photos/
//! ├── dawn.jpg        ✓ loaded
//! ├── mountains.PNG   ✓ loaded (extension match is case-insensitive)
//! ├── notes.txt       ✗ not an image, skipped
//! ├── .hidden.jpg     ✗ hidden, skipped
//! └── broken.jpg      ✗ decode failed, reported in `failed`
//! ```

use image::DynamicImage;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Directory walk failed: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Not an image or directory: {0}")]
    NotAnImage(PathBuf),
}

pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "tif", "tiff", "webp", "bmp", "gif"];

/// Decoded images plus bookkeeping, all in discovery order.
#[derive(Debug, Default)]
pub struct LoadedImages {
    pub images: Vec<DynamicImage>,
    /// File name of each entry in `images`.
    pub names: Vec<String>,
    /// File names that could not be decoded, with the reason.
    pub failed: Vec<(String, String)>,
}

/// List the images under `root`, sorted by file name.
///
/// A `root` that is itself an image file yields just that file. Hidden
/// entries are skipped. Subdirectories are only entered when `recursive`.
pub fn discover(root: &Path, recursive: bool) -> Result<Vec<PathBuf>, ScanError> {
    if root.is_file() {
        return if is_image(root) {
            Ok(vec![root.to_path_buf()])
        } else {
            Err(ScanError::NotAnImage(root.to_path_buf()))
        };
    }
    if !root.is_dir() {
        return Err(ScanError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("{} does not exist", root.display()),
        )));
    }

    let max_depth = if recursive { usize::MAX } else { 1 };
    let mut paths = Vec::new();
    let walker = WalkDir::new(root)
        .max_depth(max_depth)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_hidden(e.file_name()));
    for entry in walker {
        let entry = entry?;
        if entry.file_type().is_file() && is_image(entry.path()) {
            paths.push(entry.into_path());
        }
    }
    debug!(root = %root.display(), found = paths.len(), "Discovered images");
    Ok(paths)
}

/// Decode every path. Failures are collected, not returned as errors.
pub fn load_images(paths: &[PathBuf]) -> LoadedImages {
    let mut loaded = LoadedImages::default();
    for path in paths {
        let name = display_name(path);
        match image::open(path) {
            Ok(image) => {
                loaded.images.push(image);
                loaded.names.push(name);
            }
            Err(e) => {
                warn!(file = %name, error = %e, "Could not decode image");
                loaded.failed.push((name, e.to_string()));
            }
        }
    }
    loaded
}

/// Whether `path` has one of the [`IMAGE_EXTENSIONS`], ignoring case.
pub fn is_image(path: &Path) -> bool {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    IMAGE_EXTENSIONS.contains(&ext.as_str())
}

fn is_hidden(name: &std::ffi::OsStr) -> bool {
    name.to_string_lossy().starts_with('.')
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}
