//! Color statistics extracted from image regions

/// Joint RGB histograms
pub mod histogram;
/// Two-level sub-tile signatures
pub mod signature;
