//! Two-level image signatures built from sub-tile histograms

use crate::analysis::histogram::{Histogram, HistogramExtractor};
use crate::io::error::Result;
use crate::spatial::tiles::Tile;
use rayon::prelude::*;

/// Ordered per-sub-tile histograms describing one image region
///
/// Order follows [`Tile::subdivide`], so two signatures built with the same
/// sub-divisor can be compared position by position.
#[derive(Debug, Clone, PartialEq)]
pub struct Signature {
    histograms: Vec<Histogram>,
}

impl Signature {
    /// Wrap an ordered list of histograms
    pub const fn new(histograms: Vec<Histogram>) -> Self {
        Self { histograms }
    }

    /// Sub-tile histograms in partition order
    pub fn histograms(&self) -> &[Histogram] {
        &self.histograms
    }

    /// Number of sub-tile histograms
    pub fn len(&self) -> usize {
        self.histograms.len()
    }

    /// Whether the signature holds no histograms
    pub fn is_empty(&self) -> bool {
        self.histograms.is_empty()
    }

    /// Bin resolution shared by every histogram, `None` when empty
    pub fn bins_per_channel(&self) -> Option<usize> {
        self.histograms.first().map(Histogram::bins_per_channel)
    }

    /// Whether histograms can be compared pairwise with `other`
    ///
    /// Requires the same sub-tile count and the same bin resolution.
    pub fn is_compatible(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .histograms
                .iter()
                .zip(&other.histograms)
                .all(|(a, b)| a.bins_per_channel() == b.bins_per_channel())
    }
}

/// Split `tile` into `sub_divisor`² sub-tiles and histogram each one
///
/// Sub-tile histograms are computed in parallel; the returned order matches
/// the partition order regardless of scheduling.
///
/// # Errors
///
/// Returns `InvalidParameter` if `sub_divisor` is zero or exceeds the tile's
/// side length
pub fn generate_signature(
    extractor: &HistogramExtractor,
    tile: &Tile<'_>,
    sub_divisor: usize,
) -> Result<Signature> {
    let histograms = tile
        .subdivide(sub_divisor)?
        .par_iter()
        .map(|sub_tile| extractor.histogram(sub_tile))
        .collect();
    Ok(Signature::new(histograms))
}
