use clap::{Parser, Subcommand};
use glassframe::{batch, config, export, imaging, output, preview, scan};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "glassframe")]
#[command(about = "Frame photos on a frosted-glass copy of themselves")]
#[command(long_about = "\
Frame photos on a frosted-glass copy of themselves

Each output is three layers, merged in order and cropped to the canvas:

  1. background   the photo enlarged, blurred, optionally tinted white/black
  2. shadow       a soft black silhouette of the photo, offset
  3. foreground   the photo itself, optionally with rounded corners

The canvas is the photo plus margins, grown to an aspect ratio if one is set.
Outputs are written as <name>_output.png, or bundled into
processed_images.zip with --zip. Clashing names get _2, _3, ... appended.

Set RUST_LOG=debug to trace each layer.

Run 'glassframe gen-config' to generate a documented config file.")]
#[command(version)]
struct Cli {
    /// Config file (missing file means stock defaults)
    #[arg(long, default_value = "glassframe.toml", global = true)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Composite every image in a directory (or a single image)
    Render {
        /// Image file or directory of images
        input: PathBuf,
        /// Directory for the *_output.png files
        #[arg(long, default_value = "output")]
        output: PathBuf,
        /// Descend into subdirectories
        #[arg(long)]
        recursive: bool,
        /// Write processed_images.zip into the output directory instead of loose files
        #[arg(long)]
        zip: bool,
        /// Parallel workers (overrides [batch] max_workers)
        #[arg(long)]
        workers: Option<usize>,
    },
    /// Render one image at reduced resolution
    Preview {
        input: PathBuf,
        /// Percent of full resolution (10-100)
        #[arg(long, default_value_t = 50)]
        quality: u32,
        #[arg(long, default_value = "preview.png")]
        output: PathBuf,
    },
    /// Write a downscaled copy of an image
    Thumbnail {
        input: PathBuf,
        /// Longest edge in pixels
        #[arg(long, default_value_t = preview::THUMBNAIL_MAX_SIZE)]
        max_size: u32,
        #[arg(long, default_value = "thumbnail.png")]
        output: PathBuf,
    },
    /// Print the resolved canvas geometry for an image as JSON
    Geometry { input: PathBuf },
    /// Print a stock config file with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Render {
            input,
            output: output_dir,
            recursive,
            zip,
            workers,
        } => {
            let config = config::load_config(&cli.config)?;
            println!("==> Loading {}", input.display());
            let paths = scan::discover(&input, recursive)?;
            let loaded = scan::load_images(&paths);
            output::print_load_report(&loaded);

            let workers = config::effective_workers(workers.unwrap_or(config.batch.max_workers));
            println!("==> Compositing ({workers} workers)");
            let results = batch::process_all(&loaded.images, &config, workers);
            output::print_batch_report(&loaded.names, &results);

            if zip {
                let archive = output_dir.join(export::ZIP_FILE_NAME);
                println!("==> Archiving → {}", archive.display());
                let entries = export::export_zip(&results, &loaded.names, &archive)?;
                output::print_zip_report(&entries, &archive);
            } else {
                println!("==> Exporting → {}", output_dir.display());
                let written = export::export_batch(&results, &loaded.names, &output_dir)?;
                output::print_export_report(&written, &output_dir);
            }
        }
        Command::Preview {
            input,
            quality,
            output: path,
        } => {
            let config = config::load_config(&cli.config)?;
            let source = image::open(&input)?;
            let rendered = preview::render_preview(&source, &config, quality)?;
            export::save_png(&rendered, &path)?;
            println!(
                "{} → {} ({}x{})",
                input.display(),
                path.display(),
                rendered.width(),
                rendered.height()
            );
        }
        Command::Thumbnail {
            input,
            max_size,
            output: path,
        } => {
            let source = image::open(&input)?;
            let thumb = preview::create_thumbnail(&source, max_size);
            export::save_png(&thumb.to_rgba8(), &path)?;
            println!(
                "{} → {} ({}x{})",
                input.display(),
                path.display(),
                thumb.width(),
                thumb.height()
            );
        }
        Command::Geometry { input } => {
            let config = config::load_config(&cli.config)?;
            let dimensions = image::image_dimensions(&input)?;
            let geometry = imaging::geometry::resolve(dimensions, &config);
            println!("{}", serde_json::to_string_pretty(&geometry)?);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}
