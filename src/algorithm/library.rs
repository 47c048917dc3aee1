//! Candidate library construction
//!
//! Every candidate image is signed once with the same sub-divisor and bin
//! resolution as the source tiles. The finished library owns the candidate
//! pixels as well, so assembly can borrow matched images straight from it.

use crate::algorithm::observer::MatchObserver;
use crate::analysis::histogram::HistogramExtractor;
use crate::analysis::signature::{Signature, generate_signature};
use crate::io::configuration::MosaicConfig;
use crate::io::error::Result;
use crate::io::image::ImageLoader;
use crate::spatial::tiles::Tile;
use image::RgbImage;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

/// A candidate image together with its signature
#[derive(Debug, Clone)]
pub struct Candidate {
    path: PathBuf,
    image: RgbImage,
    signature: Signature,
}

impl Candidate {
    /// Where the candidate was loaded from
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Decoded pixels
    pub const fn image(&self) -> &RgbImage {
        &self.image
    }

    /// Sub-tile histograms
    pub const fn signature(&self) -> &Signature {
        &self.signature
    }
}

/// Read-only collection of signed candidates in insertion order
///
/// Library indices are the candidate identities used by match results.
#[derive(Debug, Clone, Default)]
pub struct CandidateLibrary {
    candidates: Vec<Candidate>,
}

impl CandidateLibrary {
    /// Number of candidates
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    /// Whether no candidate survived loading
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Candidate with the given identity
    pub fn get(&self, index: usize) -> Option<&Candidate> {
        self.candidates.get(index)
    }

    /// Candidates in insertion order
    pub fn iter(&self) -> std::slice::Iter<'_, Candidate> {
        self.candidates.iter()
    }
}

impl<'a> IntoIterator for &'a CandidateLibrary {
    type Item = &'a Candidate;
    type IntoIter = std::slice::Iter<'a, Candidate>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Signs candidate images into a [`CandidateLibrary`]
#[derive(Debug, Clone, Copy)]
pub struct CandidateLibraryBuilder {
    extractor: HistogramExtractor,
    sub_divisor: usize,
}

impl CandidateLibraryBuilder {
    /// Builder producing signatures with `sub_divisor`² histograms each
    pub const fn new(extractor: HistogramExtractor, sub_divisor: usize) -> Self {
        Self {
            extractor,
            sub_divisor,
        }
    }

    /// Builder matching the signature shape of a mosaic configuration
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if the bin count is out of range
    pub fn from_config(config: &MosaicConfig) -> Result<Self> {
        Ok(Self::new(
            HistogramExtractor::new(config.bins_per_channel)?,
            config.sub_divisor,
        ))
    }

    /// Two-level signature of a whole square image
    ///
    /// # Errors
    ///
    /// Returns `NonSquareImage` for non-square input and `InvalidParameter`
    /// if the image is narrower than the sub-divisor
    pub fn signature(&self, image: &RgbImage) -> Result<Signature> {
        generate_signature(&self.extractor, &Tile::whole(image)?, self.sub_divisor)
    }

    /// Sign already decoded images, keeping their order
    ///
    /// # Errors
    ///
    /// Fails on the first image that cannot be signed
    pub fn build_from_images(
        &self,
        images: impl IntoIterator<Item = (PathBuf, RgbImage)>,
    ) -> Result<CandidateLibrary> {
        let images: Vec<(PathBuf, RgbImage)> = images.into_iter().collect();
        let candidates = images
            .into_par_iter()
            .map(|(path, image)| self.candidate(path, image))
            .collect::<Result<Vec<_>>>()?;
        Ok(CandidateLibrary { candidates })
    }

    /// Load and sign every path, skipping files the loader rejects
    ///
    /// Library order follows `paths` regardless of how loading is scheduled.
    ///
    /// # Errors
    ///
    /// Load failures never propagate. Returns `NonSquareImage` or
    /// `InvalidParameter` if a loaded image cannot be tiled.
    pub fn build(
        &self,
        paths: &[PathBuf],
        loader: &dyn ImageLoader,
        observer: &dyn MatchObserver,
    ) -> Result<CandidateLibrary> {
        let total = paths.len();
        let completed = AtomicUsize::new(0);

        let loaded = paths
            .par_iter()
            .map(|path| {
                let candidate = match loader.load(path) {
                    Ok(image) => self
                        .candidate(path.clone(), image)
                        .map(Some)
                        .inspect_err(|error| {
                            log::error!("Cannot index candidate '{}': {error}", path.display());
                        }),
                    Err(error) => {
                        log::warn!("Skipping candidate: {error}");
                        Ok(None)
                    }
                };
                let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
                observer.candidate_indexed(done, total);
                candidate
            })
            .collect::<Result<Vec<_>>>()?;

        let candidates: Vec<Candidate> = loaded.into_iter().flatten().collect();
        log::info!(
            "Indexed {} candidates ({} skipped)",
            candidates.len(),
            total - candidates.len()
        );
        Ok(CandidateLibrary { candidates })
    }

    fn candidate(&self, path: PathBuf, image: RgbImage) -> Result<Candidate> {
        let signature = self.signature(&image)?;
        Ok(Candidate {
            path,
            image,
            signature,
        })
    }
}
