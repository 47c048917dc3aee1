//! Command-line interface for building a mosaic from a source image and a library directory

use crate::algorithm::executor::MosaicPipeline;
use crate::algorithm::observer::MatchObserver;
use crate::io::configuration::{
    DEFAULT_BINS_PER_CHANNEL, DEFAULT_IMAGE_DIVISOR, DEFAULT_SUB_DIVISOR, MosaicConfig,
    OUTPUT_EXTENSION, OUTPUT_SUFFIX,
};
use crate::io::error::{Result, invalid_parameter};
use crate::io::image::{FileSystem, ImageDiscovery, ImageLoader, ImageWriter};
use crate::io::progress::ProgressReporter;
use crate::math::comparison::Comparator;
use clap::Parser;
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "histomosaic")]
#[command(
    author,
    version,
    about = "Rebuild an image as a mosaic of histogram-matched library images"
)]
/// Command-line arguments for the mosaic tool
pub struct Cli {
    /// Square source image to rebuild
    #[arg(value_name = "SOURCE")]
    pub source: PathBuf,

    /// Directory searched recursively for candidate images
    #[arg(value_name = "LIBRARY")]
    pub library: PathBuf,

    /// Output path (defaults to <SOURCE>_mosaic.png next to the source)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Tiles along each side of the source image
    #[arg(short, long, default_value_t = DEFAULT_IMAGE_DIVISOR)]
    pub divisor: usize,

    /// Histograms along each side of every tile and candidate
    #[arg(short, long, default_value_t = DEFAULT_SUB_DIVISOR)]
    pub sub_divisor: usize,

    /// Histogram bins per color channel
    #[arg(short, long, default_value_t = DEFAULT_BINS_PER_CHANNEL)]
    pub bins: usize,

    /// Histogram distance metric
    #[arg(short, long, value_enum, default_value_t = Comparator::ChiSquare)]
    pub comparator: Comparator,

    /// Worker threads (defaults to one per core)
    #[arg(short, long)]
    pub threads: Option<usize>,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,

    /// Rebuild even if the output already exists
    #[arg(short, long)]
    pub no_skip: bool,
}

impl Cli {
    /// Check if an existing output should be left alone
    pub const fn skip_existing(&self) -> bool {
        !self.no_skip
    }

    /// Check if progress should be displayed
    pub const fn should_show_progress(&self) -> bool {
        !self.quiet
    }

    /// Default log filter for this invocation
    pub const fn log_level(&self) -> &'static str {
        if self.quiet { "warn" } else { "info" }
    }

    /// Mosaic tunables taken from the arguments
    pub const fn config(&self) -> MosaicConfig {
        MosaicConfig {
            image_divisor: self.divisor,
            sub_divisor: self.sub_divisor,
            bins_per_channel: self.bins,
            comparator: self.comparator,
        }
    }

    /// Where the mosaic will be written
    pub fn output_path(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| default_output_path(&self.source))
    }
}

/// `<dir>/<stem>_mosaic.png` for a given source path
pub fn default_output_path(source: &Path) -> PathBuf {
    let stem = source.file_stem().unwrap_or_default();
    let output_name = format!(
        "{}{OUTPUT_SUFFIX}.{OUTPUT_EXTENSION}",
        stem.to_string_lossy()
    );

    if let Some(parent) = source.parent() {
        parent.join(output_name)
    } else {
        PathBuf::from(output_name)
    }
}

/// Orchestrates one mosaic run with optional progress display
pub struct MosaicProcessor {
    cli: Cli,
    storage: FileSystem,
    progress_reporter: Option<ProgressReporter>,
}

impl MosaicProcessor {
    /// Create a processor for the given CLI arguments
    pub fn new(cli: Cli) -> Self {
        let progress_reporter = cli.should_show_progress().then(ProgressReporter::new);

        Self {
            cli,
            storage: FileSystem,
            progress_reporter,
        }
    }

    /// Run the pipeline according to the CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid, the source image
    /// cannot be loaded or tiled, no candidate is usable, or the output
    /// cannot be written
    pub fn process(&self) -> Result<()> {
        let output_path = self.cli.output_path();
        if self.cli.skip_existing() && output_path.exists() {
            log::warn!("Skipping: {} (output exists)", output_path.display());
            return Ok(());
        }

        let pipeline = MosaicPipeline::new(self.cli.config())?;

        match self.cli.threads {
            Some(threads) => {
                if threads == 0 {
                    return Err(invalid_parameter(
                        "threads",
                        &threads,
                        &"must be at least 1",
                    ));
                }
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .build()
                    .map_err(|e| invalid_parameter("threads", &threads, &e))?;
                pool.install(|| self.run(&pipeline, &output_path))
            }
            None => self.run(&pipeline, &output_path),
        }
    }

    fn run(&self, pipeline: &MosaicPipeline, output_path: &Path) -> Result<()> {
        let start_time = Instant::now();
        let observer: &dyn MatchObserver = match &self.progress_reporter {
            Some(reporter) => reporter,
            None => &(),
        };

        let source = self.storage.load(&self.cli.source)?;
        let paths = self.storage.discover(&self.cli.library)?;
        log::info!(
            "Found {} candidate files under {}",
            paths.len(),
            self.cli.library.display()
        );

        let library = pipeline
            .library_builder()
            .build(&paths, &self.storage, observer)?;
        let mosaic = pipeline.render(&source, &library, observer)?;

        if let Some(ref reporter) = self.progress_reporter {
            reporter.finish();
        }

        self.storage.write(mosaic.image(), output_path)?;
        log::info!(
            "Wrote {}x{} mosaic to {} in {:.2?}",
            mosaic.image().width(),
            mosaic.image().height(),
            output_path.display(),
            start_time.elapsed()
        );
        Ok(())
    }
}
