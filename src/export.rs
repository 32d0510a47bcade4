//! Writing composited results to disk.
//!
//! Every output is a lossless PNG named after its source:
//!
//! ```text
//! dawn.jpg        → dawn_output.png
//! pier.night.tif  → pier.night_output.png
//! ```
//!
//! Names are unique within a batch. A recursive scan can find `a/x.jpg` and
//! `b/x.jpg`; the second becomes `x_2_output.png`. Results go either to loose
//! files in a directory ([`export_batch`]) or into one archive
//! ([`export_zip`]).

use image::{ImageFormat, RgbaImage};
use std::collections::HashSet;
use std::fs::File;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};
use zip::CompressionMethod;
use zip::write::SimpleFileOptions;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("PNG encoding failed for {path}: {source}")]
    Encode {
        path: PathBuf,
        source: image::ImageError,
    },
    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),
}

const OUTPUT_SUFFIX: &str = "_output.png";

/// Archive name used by the CLI's `--zip`.
pub const ZIP_FILE_NAME: &str = "processed_images.zip";

fn output_stem(source_name: &str) -> &str {
    match source_name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => source_name,
    }
}

/// Output file name for a source file name: the last extension is replaced by
/// `_output.png`.
pub fn output_file_name(source_name: &str) -> String {
    format!("{}{OUTPUT_SUFFIX}", output_stem(source_name))
}

/// Output names for a whole batch, in input order.
///
/// Like [`output_file_name`], except that a name already taken (compared
/// case-insensitively, as on common filesystems) gets `_2`, `_3`, ... before
/// the suffix.
///
/// ```
/// # use glassframe::export::unique_output_names;
/// let names = ["x.jpg", "x.png", "y.jpg"].map(String::from);
/// assert_eq!(
///     unique_output_names(&names),
///     ["x_output.png", "x_2_output.png", "y_output.png"]
/// );
/// ```
pub fn unique_output_names(names: &[String]) -> Vec<String> {
    let mut taken = HashSet::new();
    names
        .iter()
        .map(|name| {
            let stem = output_stem(name);
            let mut candidate = format!("{stem}{OUTPUT_SUFFIX}");
            let mut n = 2;
            while !taken.insert(candidate.to_lowercase()) {
                candidate = format!("{stem}_{n}{OUTPUT_SUFFIX}");
                n += 1;
            }
            candidate
        })
        .collect()
}

/// Encode `image` as PNG at `path`.
pub fn save_png(image: &RgbaImage, path: &Path) -> Result<(), ExportError> {
    image
        .save_with_format(path, ImageFormat::Png)
        .map_err(|source| ExportError::Encode {
            path: path.to_path_buf(),
            source,
        })
}

/// Write every `Some` result into `output_dir` and return the written paths,
/// in input order. `None` entries (failed images) are skipped.
///
/// `names` holds the source file name for each result.
pub fn export_batch(
    results: &[Option<RgbaImage>],
    names: &[String],
    output_dir: &Path,
) -> Result<Vec<PathBuf>, ExportError> {
    std::fs::create_dir_all(output_dir)?;

    let mut written = Vec::new();
    for ((result, name), file_name) in results
        .iter()
        .zip(names)
        .zip(unique_output_names(names))
    {
        let Some(image) = result else {
            warn!(file = %name, "No output to export");
            continue;
        };
        let path = output_dir.join(file_name);
        save_png(image, &path)?;
        debug!(path = %path.display(), "Exported");
        written.push(path);
    }
    Ok(written)
}

/// Bundle every `Some` result into a deflated ZIP archive at `path` and return
/// the entry names, in input order. Entries are named as [`export_batch`]
/// names its files; `None` entries are skipped. Missing parent directories
/// are created.
pub fn export_zip(
    results: &[Option<RgbaImage>],
    names: &[String],
    path: &Path,
) -> Result<Vec<String>, ExportError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let mut archive = zip::ZipWriter::new(File::create(path)?);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    let mut entries = Vec::new();
    for ((result, name), entry) in results
        .iter()
        .zip(names)
        .zip(unique_output_names(names))
    {
        let Some(image) = result else {
            warn!(file = %name, "No output to archive");
            continue;
        };
        let mut png = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
            .map_err(|source| ExportError::Encode {
                path: PathBuf::from(&entry),
                source,
            })?;
        archive.start_file(entry.as_str(), options)?;
        archive.write_all(&png)?;
        debug!(entry = %entry, "Archived");
        entries.push(entry);
    }
    archive.finish()?;
    Ok(entries)
}
