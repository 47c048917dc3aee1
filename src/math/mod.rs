//! Mathematical utilities for signature comparison

/// Histogram distance metrics
pub mod comparison;
