//! Joint color histograms over tile regions
//!
//! All three channels are binned together, so a histogram with `b` bins per
//! channel has `b³` cells. Only occupied cells are ever materialized: pixels
//! are mapped to flat cell indices, sorted and run-length counted. The result
//! is normalized to unit L2 length so regions with different pixel counts
//! remain comparable.

use crate::io::configuration::{CHANNEL_RANGE, MAX_BINS_PER_CHANNEL};
use crate::io::error::{Result, invalid_parameter};
use crate::spatial::tiles::Tile;
use image::Rgb;
use std::cmp::Ordering;
use std::iter::Peekable;
use std::slice;

/// Normalized joint RGB histogram
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    bins_per_channel: usize,
    // Flat cell index -> weight, ascending by index, zero weights omitted
    entries: Vec<(usize, f64)>,
}

impl Histogram {
    /// Build a histogram from explicit cell weights
    ///
    /// Cells are flat indices `(r * b + g) * b + blue`. Duplicate cells are
    /// summed and zero weights dropped. No normalization is applied.
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if the bin count is out of range or a cell
    /// index lies outside the `b³` grid
    pub fn from_weights(
        bins_per_channel: usize,
        weights: impl IntoIterator<Item = (usize, f64)>,
    ) -> Result<Self> {
        validate_bins(bins_per_channel)?;
        let total = bins_per_channel.pow(3);

        let mut entries: Vec<(usize, f64)> = weights.into_iter().collect();
        if let Some(&(index, _)) = entries.iter().find(|(index, _)| *index >= total) {
            return Err(invalid_parameter(
                "cell",
                &index,
                &format!("must be below {total}"),
            ));
        }
        entries.sort_by_key(|&(index, _)| index);

        let mut merged: Vec<(usize, f64)> = Vec::with_capacity(entries.len());
        for (index, weight) in entries {
            match merged.last_mut() {
                Some((last, sum)) if *last == index => *sum += weight,
                _ => merged.push((index, weight)),
            }
        }
        merged.retain(|&(_, weight)| weight.abs() > 0.0);

        Ok(Self {
            bins_per_channel,
            entries: merged,
        })
    }

    /// Bins along each color axis
    pub const fn bins_per_channel(&self) -> usize {
        self.bins_per_channel
    }

    /// Number of cells in the joint grid, occupied or not
    pub const fn total_bins(&self) -> usize {
        self.bins_per_channel * self.bins_per_channel * self.bins_per_channel
    }

    /// Occupied cells as `(flat index, weight)`, ascending by index
    pub fn entries(&self) -> &[(usize, f64)] {
        &self.entries
    }

    /// Number of occupied cells
    pub fn occupied_bins(&self) -> usize {
        self.entries.len()
    }

    /// Whether no pixel contributed to this histogram
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Weight of the cell holding the given per-channel bins
    pub fn get(&self, red: usize, green: usize, blue: usize) -> f64 {
        let b = self.bins_per_channel;
        if red >= b || green >= b || blue >= b {
            return 0.0;
        }
        let index = (red * b + green) * b + blue;
        self.entries
            .binary_search_by_key(&index, |&(cell, _)| cell)
            .ok()
            .and_then(|position| self.entries.get(position))
            .map_or(0.0, |&(_, weight)| weight)
    }

    /// Sum of all weights
    pub fn sum(&self) -> f64 {
        self.entries.iter().map(|&(_, weight)| weight).sum()
    }

    /// Euclidean length of the weight vector
    pub fn norm(&self) -> f64 {
        self.entries
            .iter()
            .map(|&(_, weight)| weight * weight)
            .sum::<f64>()
            .sqrt()
    }

    /// Walk the union of occupied cells of both histograms in index order
    ///
    /// Yields `(self weight, other weight)` with 0.0 standing in for a cell
    /// that only one side occupies. Cells empty in both are skipped.
    pub fn paired_bins<'h>(&'h self, other: &'h Self) -> PairedBins<'h> {
        PairedBins {
            left: self.entries.iter().peekable(),
            right: other.entries.iter().peekable(),
        }
    }
}

/// Merge-join over the occupied cells of two histograms
pub struct PairedBins<'h> {
    left: Peekable<slice::Iter<'h, (usize, f64)>>,
    right: Peekable<slice::Iter<'h, (usize, f64)>>,
}

impl Iterator for PairedBins<'_> {
    type Item = (f64, f64);

    fn next(&mut self) -> Option<Self::Item> {
        match (self.left.peek(), self.right.peek()) {
            (Some(&&(li, lv)), Some(&&(ri, rv))) => match li.cmp(&ri) {
                Ordering::Less => {
                    self.left.next();
                    Some((lv, 0.0))
                }
                Ordering::Greater => {
                    self.right.next();
                    Some((0.0, rv))
                }
                Ordering::Equal => {
                    self.left.next();
                    self.right.next();
                    Some((lv, rv))
                }
            },
            (Some(&&(_, lv)), None) => {
                self.left.next();
                Some((lv, 0.0))
            }
            (None, Some(&&(_, rv))) => {
                self.right.next();
                Some((0.0, rv))
            }
            (None, None) => None,
        }
    }
}

/// Computes joint histograms at a fixed bin resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistogramExtractor {
    bins_per_channel: usize,
}

impl HistogramExtractor {
    /// Create an extractor with `bins_per_channel` bins along each color axis
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` unless `1 <= bins_per_channel <= 256`
    pub fn new(bins_per_channel: usize) -> Result<Self> {
        validate_bins(bins_per_channel)?;
        Ok(Self { bins_per_channel })
    }

    /// Bins along each color axis
    pub const fn bins_per_channel(&self) -> usize {
        self.bins_per_channel
    }

    /// Bin an 8-bit intensity uniformly over `[0, 256)`
    pub const fn bin_of(&self, intensity: u8) -> usize {
        intensity as usize * self.bins_per_channel / CHANNEL_RANGE
    }

    /// Flat cell index `(r * b + g) * b + blue` of a pixel
    pub const fn cell_of(&self, pixel: &Rgb<u8>) -> usize {
        let b = self.bins_per_channel;
        let [red, green, blue] = pixel.0;
        (self.bin_of(red) * b + self.bin_of(green)) * b + self.bin_of(blue)
    }

    /// Joint histogram of a tile, scaled to unit L2 norm
    ///
    /// A tile with no pixels yields an empty histogram.
    pub fn histogram(&self, tile: &Tile<'_>) -> Histogram {
        let mut cells: Vec<usize> = tile.pixels().map(|pixel| self.cell_of(pixel)).collect();
        cells.sort_unstable();

        let mut counts: Vec<(usize, u32)> = Vec::new();
        for cell in cells {
            match counts.last_mut() {
                Some((last, count)) if *last == cell => *count += 1,
                _ => counts.push((cell, 1)),
            }
        }

        let norm = counts
            .iter()
            .map(|&(_, count)| f64::from(count).powi(2))
            .sum::<f64>()
            .sqrt();
        let entries = counts
            .into_iter()
            .map(|(cell, count)| (cell, f64::from(count) / norm))
            .collect();

        Histogram {
            bins_per_channel: self.bins_per_channel,
            entries,
        }
    }
}

fn validate_bins(bins_per_channel: usize) -> Result<()> {
    if (1..=MAX_BINS_PER_CHANNEL).contains(&bins_per_channel) {
        Ok(())
    } else {
        Err(invalid_parameter(
            "bins_per_channel",
            &bins_per_channel,
            &format!("must be between 1 and {MAX_BINS_PER_CHANNEL}"),
        ))
    }
}
