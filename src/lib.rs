//! Photo mosaic generation by nearest color-histogram matching
//!
//! A square source image is cut into a grid of tiles. Every tile and every
//! candidate image is described by a signature of joint RGB histograms taken
//! over a finer sub-grid, and each tile is replaced by the candidate whose
//! signature lies closest under the chosen distance metric.

#![forbid(unsafe_code)]

/// Library construction, match search, assembly and pipeline orchestration
pub mod algorithm;
/// Histogram extraction and image signatures
pub mod analysis;
/// Input/output boundaries, configuration and error handling
pub mod io;
/// Histogram distance metrics
pub mod math;
/// Square grid partitioning into borrowed tile views
pub mod spatial;

pub use io::error::{MosaicError, Result};
