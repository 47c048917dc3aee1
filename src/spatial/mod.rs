//! Spatial data structures for image tiling

/// Square grid partitioning and tile views
pub mod tiles;

pub use tiles::{Rect, Tile};
