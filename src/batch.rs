//! Batch compositing.
//!
//! Fans [`process`](crate::imaging::process) out over a slice of images on a
//! bounded [rayon](https://docs.rs/rayon) pool. Results come back in input
//! order, one per image:
//!
//! ```text
//! images:   [A,        B,     C       ]
//! results:  [Some(A'), None,  Some(C')]   B failed or panicked
//! ```
//!
//! Every task gets its own clone of the configuration and never touches
//! another task's images. A failing image is logged and reported as `None`;
//! the batch itself always completes.

use crate::config::CompositeConfig;
use crate::imaging::{Compositor, LayerCompositor};
use image::{DynamicImage, RgbaImage};
use rayon::prelude::*;
use std::panic::{AssertUnwindSafe, catch_unwind};
use tracing::{info, warn};

/// Composite every image with the production compositor.
pub fn process_all(
    images: &[DynamicImage],
    config: &CompositeConfig,
    max_workers: usize,
) -> Vec<Option<RgbaImage>> {
    process_all_with(&LayerCompositor, images, config, max_workers)
}

/// Composite every image with `compositor` (allows testing with a mock).
///
/// At most `max_workers` images are in flight at once; zero is treated as
/// one. If a pool cannot be built the images are processed sequentially.
pub fn process_all_with(
    compositor: &impl Compositor,
    images: &[DynamicImage],
    config: &CompositeConfig,
    max_workers: usize,
) -> Vec<Option<RgbaImage>> {
    let workers = max_workers.max(1);
    info!(images = images.len(), workers, "Compositing batch");

    let run = || -> Vec<Option<RgbaImage>> {
        images
            .par_iter()
            .enumerate()
            .map(|(index, image)| composite_one(compositor, index, image, config.clone()))
            .collect()
    };

    match rayon::ThreadPoolBuilder::new().num_threads(workers).build() {
        Ok(pool) => pool.install(run),
        Err(e) => {
            warn!(error = %e, "Thread pool unavailable, compositing sequentially");
            images
                .iter()
                .enumerate()
                .map(|(index, image)| composite_one(compositor, index, image, config.clone()))
                .collect()
        }
    }
}

/// Run one image, turning errors and panics into `None`.
fn composite_one(
    compositor: &impl Compositor,
    index: usize,
    image: &DynamicImage,
    config: CompositeConfig,
) -> Option<RgbaImage> {
    match catch_unwind(AssertUnwindSafe(|| compositor.composite(image, &config))) {
        Ok(Ok(output)) => Some(output),
        Ok(Err(e)) => {
            warn!(index, error = %e, "Image failed");
            None
        }
        Err(_) => {
            warn!(index, "Image panicked");
            None
        }
    }
}
