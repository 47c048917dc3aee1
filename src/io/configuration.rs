//! Mosaic tunables and runtime configuration defaults

use crate::io::error::{Result, invalid_parameter};
use crate::math::comparison::Comparator;

// Grid geometry
/// Number of tiles along each side of the source image
pub const DEFAULT_IMAGE_DIVISOR: usize = 20;
/// Number of sub-tiles along each side of a tile when building signatures
pub const DEFAULT_SUB_DIVISOR: usize = 3;

// Histogram resolution
/// Histogram bins per color channel
pub const DEFAULT_BINS_PER_CHANNEL: usize = 50;
/// Upper bound on bins per channel (one bin per 8-bit intensity)
pub const MAX_BINS_PER_CHANNEL: usize = 256;
/// Exclusive upper bound of an 8-bit channel intensity
pub const CHANNEL_RANGE: usize = 256;

// Progress bar display settings
/// Width of progress bars in characters
pub const PROGRESS_BAR_WIDTH: u16 = 40;

// Output settings
/// Suffix added to output filenames
pub const OUTPUT_SUFFIX: &str = "_mosaic";
/// Extension used for default output filenames
pub const OUTPUT_EXTENSION: &str = "png";
/// File extensions accepted as candidate images
pub const SUPPORTED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "gif", "tiff", "webp"];

/// Tunable parameters for a mosaic run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MosaicConfig {
    /// Source image is cut into `image_divisor` x `image_divisor` tiles
    pub image_divisor: usize,
    /// Every tile and candidate is cut into `sub_divisor` x `sub_divisor` histograms
    pub sub_divisor: usize,
    /// Histogram resolution per color channel
    pub bins_per_channel: usize,
    /// Distance metric used for matching
    pub comparator: Comparator,
}

impl Default for MosaicConfig {
    fn default() -> Self {
        Self {
            image_divisor: DEFAULT_IMAGE_DIVISOR,
            sub_divisor: DEFAULT_SUB_DIVISOR,
            bins_per_channel: DEFAULT_BINS_PER_CHANNEL,
            comparator: Comparator::ChiSquare,
        }
    }
}

impl MosaicConfig {
    /// Check every parameter is within its supported range
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if a divisor is zero or the bin count is
    /// outside `1..=256`
    pub fn validate(&self) -> Result<()> {
        if self.image_divisor == 0 {
            return Err(invalid_parameter(
                "image_divisor",
                &self.image_divisor,
                &"must be at least 1",
            ));
        }
        if self.sub_divisor == 0 {
            return Err(invalid_parameter(
                "sub_divisor",
                &self.sub_divisor,
                &"must be at least 1",
            ));
        }
        if !(1..=MAX_BINS_PER_CHANNEL).contains(&self.bins_per_channel) {
            return Err(invalid_parameter(
                "bins_per_channel",
                &self.bins_per_channel,
                &format!("must be between 1 and {MAX_BINS_PER_CHANNEL}"),
            ));
        }
        Ok(())
    }
}
