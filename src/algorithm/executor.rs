//! Mosaic pipeline orchestration
//!
//! Source image → tiles → signatures → per-tile best match → composite. The
//! candidate library is built before [`MosaicPipeline::render`] is called and
//! only borrowed immutably afterwards, which is the barrier between library
//! construction and the parallel search.

use crate::algorithm::assembly::assemble;
use crate::algorithm::library::{Candidate, CandidateLibrary, CandidateLibraryBuilder};
use crate::algorithm::observer::MatchObserver;
use crate::algorithm::search::{Match, find_best_matches};
use crate::analysis::histogram::HistogramExtractor;
use crate::analysis::signature::{Signature, generate_signature};
use crate::io::configuration::MosaicConfig;
use crate::io::error::{MosaicError, Result, invalid_parameter};
use crate::spatial::tiles::partition;
use image::RgbImage;
use ndarray::Array2;
use rayon::prelude::*;

/// Finished composite plus the assignment that produced it
#[derive(Debug, Clone)]
pub struct Mosaic {
    image: RgbImage,
    // Indexed [x_index, y_index] -> library index
    assignment: Array2<usize>,
    total_distance: f64,
}

impl Mosaic {
    /// Composite image
    pub const fn image(&self) -> &RgbImage {
        &self.image
    }

    /// Take ownership of the composite image
    pub fn into_image(self) -> RgbImage {
        self.image
    }

    /// Library index chosen for every tile, indexed `[x_index, y_index]`
    pub const fn assignment(&self) -> &Array2<usize> {
        &self.assignment
    }

    /// Library index chosen for the tile at the given grid position
    pub fn candidate_at(&self, x_index: usize, y_index: usize) -> Option<usize> {
        self.assignment.get((x_index, y_index)).copied()
    }

    /// Sum of the winning aggregate distances over all tiles
    pub const fn total_distance(&self) -> f64 {
        self.total_distance
    }

    /// Number of distinct candidates used
    pub fn distinct_candidates(&self) -> usize {
        let mut used: Vec<usize> = self.assignment.iter().copied().collect();
        used.sort_unstable();
        used.dedup();
        used.len()
    }
}

/// Runs every mosaic stage with one configuration
#[derive(Debug, Clone, Copy)]
pub struct MosaicPipeline {
    config: MosaicConfig,
    extractor: HistogramExtractor,
}

impl MosaicPipeline {
    /// Create a pipeline after validating `config`
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if any tunable is out of range
    pub fn new(config: MosaicConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            extractor: HistogramExtractor::new(config.bins_per_channel)?,
        })
    }

    /// Active configuration
    pub const fn config(&self) -> &MosaicConfig {
        &self.config
    }

    /// Library builder producing signatures comparable with this pipeline's tiles
    pub const fn library_builder(&self) -> CandidateLibraryBuilder {
        CandidateLibraryBuilder::new(self.extractor, self.config.sub_divisor)
    }

    /// Signatures of every source tile in partition order
    ///
    /// # Errors
    ///
    /// Returns `NonSquareImage` for non-square input and `InvalidParameter`
    /// if a divisor is too large for the image
    pub fn source_signatures(&self, source: &RgbImage) -> Result<Vec<Signature>> {
        let tiles = partition(source, self.config.image_divisor)?;
        log::debug!(
            "Partitioned {}x{} source into {} tiles",
            source.width(),
            source.height(),
            tiles.len()
        );

        tiles
            .par_iter()
            .map(|tile| generate_signature(&self.extractor, tile, self.config.sub_divisor))
            .collect()
    }

    /// Best library match for every source tile in partition order
    ///
    /// # Errors
    ///
    /// Propagates partition errors, `EmptyLibrary`, `SignatureMismatch` and
    /// `ResolutionMismatch`
    pub fn match_tiles(
        &self,
        source: &RgbImage,
        library: &CandidateLibrary,
        observer: &dyn MatchObserver,
    ) -> Result<Vec<Match>> {
        if library.is_empty() {
            return Err(MosaicError::EmptyLibrary);
        }
        let signatures = self.source_signatures(source)?;
        find_best_matches(&signatures, library, self.config.comparator, observer)
    }

    /// Build the full mosaic for `source` from `library`
    ///
    /// # Errors
    ///
    /// Propagates matching errors and assembly size mismatches
    pub fn render(
        &self,
        source: &RgbImage,
        library: &CandidateLibrary,
        observer: &dyn MatchObserver,
    ) -> Result<Mosaic> {
        let matches = self.match_tiles(source, library, observer)?;

        let images = matches
            .iter()
            .map(|found| {
                library
                    .get(found.candidate)
                    .map(Candidate::image)
                    .ok_or_else(|| {
                        invalid_parameter("candidate", &found.candidate, &"not in library")
                    })
            })
            .collect::<Result<Vec<_>>>()?;
        let image = assemble(&images, self.config.image_divisor)?;

        let divisor = self.config.image_divisor;
        let indices: Vec<usize> = matches.iter().map(|found| found.candidate).collect();
        let assignment =
            Array2::from_shape_vec((divisor, divisor), indices).map_err(|_shape_error| {
                MosaicError::TileCount {
                    expected: divisor * divisor,
                    found: matches.len(),
                }
            })?;
        let total_distance = matches.iter().map(|found| found.distance).sum();

        let mosaic = Mosaic {
            image,
            assignment,
            total_distance,
        };
        log::info!(
            "Matched {} tiles using {} distinct candidates (total {} distance {:.4})",
            matches.len(),
            mosaic.distinct_candidates(),
            self.config.comparator,
            mosaic.total_distance
        );
        Ok(mosaic)
    }
}
