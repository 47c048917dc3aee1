//! Nearest-candidate search over a read-only library
//!
//! Each source tile is matched independently: every candidate is scored by
//! the sum of per-sub-tile distances and the lowest total wins. Ties keep the
//! candidate that was inserted into the library first.

use crate::algorithm::library::CandidateLibrary;
use crate::algorithm::observer::MatchObserver;
use crate::analysis::signature::Signature;
use crate::io::error::{MosaicError, Result};
use crate::math::comparison::Comparator;
use rayon::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Winning candidate for one source tile
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Match {
    /// Library index of the chosen candidate
    pub candidate: usize,
    /// Aggregate distance between the tile and the candidate
    pub distance: f64,
}

/// Sum of per-sub-tile distances between two signatures
///
/// Histograms are paired by position; callers check compatibility first.
pub fn aggregate_distance(source: &Signature, candidate: &Signature, comparator: Comparator) -> f64 {
    source
        .histograms()
        .iter()
        .zip(candidate.histograms())
        .map(|(a, b)| comparator.distance(a, b))
        .sum()
}

/// Scan the whole library for the candidate closest to `source`
///
/// # Errors
///
/// Returns `EmptyLibrary` when there is nothing to match,
/// `SignatureMismatch` when a candidate has a different sub-tile count and
/// `ResolutionMismatch` when it was binned at a different resolution
pub fn find_best_match(
    source: &Signature,
    library: &CandidateLibrary,
    comparator: Comparator,
) -> Result<Match> {
    let mut best: Option<Match> = None;

    for (index, candidate) in library.iter().enumerate() {
        let signature = candidate.signature();
        if !source.is_compatible(signature) {
            return Err(incompatibility(source, signature, index));
        }

        let distance = aggregate_distance(source, signature, comparator);
        // Strict comparison: earlier candidates win ties
        if best.is_none_or(|current| distance < current.distance) {
            best = Some(Match {
                candidate: index,
                distance,
            });
        }
    }

    best.ok_or(MosaicError::EmptyLibrary)
}

fn incompatibility(source: &Signature, candidate: &Signature, index: usize) -> MosaicError {
    match (source.bins_per_channel(), candidate.bins_per_channel()) {
        (Some(expected), Some(found)) if source.len() == candidate.len() && expected != found => {
            MosaicError::ResolutionMismatch {
                expected,
                found,
                candidate: index,
            }
        }
        _ => MosaicError::SignatureMismatch {
            expected: source.len(),
            found: candidate.len(),
            candidate: index,
        },
    }
}

/// Match every source tile in parallel, preserving tile order
///
/// # Errors
///
/// Returns `EmptyLibrary` for an empty library, or the first signature
/// incompatibility encountered
pub fn find_best_matches(
    sources: &[Signature],
    library: &CandidateLibrary,
    comparator: Comparator,
    observer: &dyn MatchObserver,
) -> Result<Vec<Match>> {
    if library.is_empty() {
        return Err(MosaicError::EmptyLibrary);
    }

    let total = sources.len();
    let completed = AtomicUsize::new(0);

    sources
        .par_iter()
        .map(|source| {
            let found = find_best_match(source, library, comparator)?;
            let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
            observer.tile_matched(done, total);
            Ok(found)
        })
        .collect()
}
