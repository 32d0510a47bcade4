//! CLI output formatting.
//!
//! Each report has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format functions
//! are pure: no I/O, no side effects.
//!
//! # Output Format
//!
//! ## Load
//!
//! ```text
//! Loaded 2 images
//!     skipped broken.jpg: Format error decoding Jpeg
//! ```
//!
//! ## Render
//!
//! ```text
//! 001 dawn.jpg → 1280x1600
//! 002 broken-later.jpg → failed
//! Composited 1 of 2 images
//! ```
//!
//! ## Export
//!
//! ```text
//! dawn_output.png
//! Wrote 1 file to out/
//! ```
//!
//! ## Archive
//!
//! ```text
//! dawn_output.png
//! Archived 1 file in out/processed_images.zip
//! ```

use crate::scan::LoadedImages;
use image::RgbaImage;
use std::path::{Path, PathBuf};

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{n} {word}")
    } else {
        format!("{n} {word}s")
    }
}

// ============================================================================
// Load
// ============================================================================

pub fn format_load_report(loaded: &LoadedImages) -> Vec<String> {
    let mut lines = vec![format!("Loaded {}", plural(loaded.images.len(), "image"))];
    for (name, reason) in &loaded.failed {
        lines.push(format!("    skipped {name}: {reason}"));
    }
    lines
}

pub fn print_load_report(loaded: &LoadedImages) {
    for line in format_load_report(loaded) {
        println!("{line}");
    }
}

// ============================================================================
// Render
// ============================================================================

/// One line per image (index, name, output size or `failed`) and a summary.
pub fn format_batch_report(names: &[String], results: &[Option<RgbaImage>]) -> Vec<String> {
    let mut lines = Vec::new();
    for (i, (name, result)) in names.iter().zip(results).enumerate() {
        let status = match result {
            Some(image) => format!("{}x{}", image.width(), image.height()),
            None => "failed".to_string(),
        };
        lines.push(format!("{} {} → {}", format_index(i + 1), name, status));
    }
    let done = results.iter().filter(|r| r.is_some()).count();
    lines.push(format!(
        "Composited {done} of {}",
        plural(results.len(), "image")
    ));
    lines
}

pub fn print_batch_report(names: &[String], results: &[Option<RgbaImage>]) {
    for line in format_batch_report(names, results) {
        println!("{line}");
    }
}

// ============================================================================
// Export
// ============================================================================

/// Written file names (relative to `output_dir`) and a summary.
pub fn format_export_report(written: &[PathBuf], output_dir: &Path) -> Vec<String> {
    let mut lines: Vec<String> = written
        .iter()
        .map(|p| {
            p.strip_prefix(output_dir)
                .unwrap_or(p)
                .display()
                .to_string()
        })
        .collect();
    lines.push(format!(
        "Wrote {} to {}/",
        plural(written.len(), "file"),
        output_dir.display()
    ));
    lines
}

pub fn print_export_report(written: &[PathBuf], output_dir: &Path) {
    for line in format_export_report(written, output_dir) {
        println!("{line}");
    }
}

/// Archive entry names and a summary.
pub fn format_zip_report(entries: &[String], archive: &Path) -> Vec<String> {
    let mut lines = entries.to_vec();
    lines.push(format!(
        "Archived {} in {}",
        plural(entries.len(), "file"),
        archive.display()
    ));
    lines
}

pub fn print_zip_report(entries: &[String], archive: &Path) {
    for line in format_zip_report(entries, archive) {
        println!("{line}");
    }
}
