//! Histogram distance metrics mapped onto a shared "lower is closer" scale
//!
//! Each metric is a raw statistic followed by a normalization step. After
//! normalization a histogram compared with itself scores 0 under every metric
//! and larger values always mean less similar.

use crate::analysis::histogram::Histogram;
use clap::ValueEnum;
use std::fmt;

// Denominators below this are treated as zero
const EPSILON: f64 = f64::EPSILON;
// Variance below this means every cell carries the same weight
const FLAT_VARIANCE: f64 = 1e-12;

/// Histogram distance metric, chosen once per run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, ValueEnum)]
pub enum Comparator {
    /// Chi-square statistic, weighted by the first histogram
    #[default]
    ChiSquare,
    /// Pearson correlation over all cells, reported as `1 - r`
    Correlation,
    /// Histogram intersection scaled to `[0, 1]`, reported as `1 - overlap`
    Intersection,
    /// Hellinger (Bhattacharyya) distance
    #[value(alias = "bhattacharyya")]
    Hellinger,
}

impl Comparator {
    /// Every available metric
    pub const ALL: [Self; 4] = [
        Self::ChiSquare,
        Self::Correlation,
        Self::Intersection,
        Self::Hellinger,
    ];

    /// Normalized distance between two histograms
    ///
    /// Both histograms must share a bin resolution; cells are matched by
    /// flat index only.
    pub fn distance(self, a: &Histogram, b: &Histogram) -> f64 {
        if a.is_empty() && b.is_empty() {
            return 0.0;
        }
        self.normalize(self.raw_score(a, b))
    }

    /// Statistic before mapping onto the shared scale
    pub fn raw_score(self, a: &Histogram, b: &Histogram) -> f64 {
        match self {
            Self::ChiSquare => chi_square(a, b),
            Self::Correlation => correlation(a, b),
            Self::Intersection => intersection(a, b),
            Self::Hellinger => hellinger(a, b),
        }
    }

    /// Map a raw statistic so that 0 means identical
    ///
    /// An undefined statistic maps to infinity so it can never win a match.
    pub fn normalize(self, raw: f64) -> f64 {
        let distance = match self {
            Self::ChiSquare | Self::Hellinger => raw,
            Self::Correlation | Self::Intersection => 1.0 - raw,
        };
        if distance.is_nan() {
            f64::INFINITY
        } else {
            distance.max(0.0)
        }
    }
}

impl fmt::Display for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::ChiSquare => "chi-square",
            Self::Correlation => "correlation",
            Self::Intersection => "intersection",
            Self::Hellinger => "hellinger",
        };
        f.write_str(name)
    }
}

// Sum of (a - b)² / a over cells the first histogram occupies
fn chi_square(a: &Histogram, b: &Histogram) -> f64 {
    a.paired_bins(b)
        .filter(|&(x, _)| x.abs() > EPSILON)
        .map(|(x, y)| (x - y) * (x - y) / x)
        .sum()
}

// Pearson correlation across all b³ cells, in [-1, 1]
fn correlation(a: &Histogram, b: &Histogram) -> f64 {
    let n = a.total_bins().max(b.total_bins()) as f64;

    let (mut s1, mut s2, mut s11, mut s22, mut s12) = (0.0, 0.0, 0.0, 0.0, 0.0);
    for (x, y) in a.paired_bins(b) {
        s1 += x;
        s2 += y;
        s11 += x * x;
        s22 += y * y;
        s12 += x * y;
    }

    let numerator = s12 - s1 * s2 / n;
    let (variance_a, variance_b) = (s11 - s1 * s1 / n, s22 - s2 * s2 / n);
    let denominator = variance_a * variance_b;
    // Rounding can leave a flat histogram with a tiny negative variance
    if denominator > EPSILON {
        return (numerator / denominator.sqrt()).clamp(-1.0, 1.0);
    }

    // A constant histogram has no defined correlation with anything else
    let both_flat = variance_a.abs() <= FLAT_VARIANCE && variance_b.abs() <= FLAT_VARIANCE;
    if both_flat || a == b { 1.0 } else { 0.0 }
}

// Shared mass divided by the larger total mass, in [0, 1]
fn intersection(a: &Histogram, b: &Histogram) -> f64 {
    let shared: f64 = a.paired_bins(b).map(|(x, y)| x.min(y)).sum();
    let total = a.sum().max(b.sum());
    if total > EPSILON { shared / total } else { 1.0 }
}

fn hellinger(a: &Histogram, b: &Histogram) -> f64 {
    let coefficient: f64 = a
        .paired_bins(b)
        .filter(|&(x, y)| x > 0.0 && y > 0.0)
        .map(|(x, y)| (x * y).sqrt())
        .sum();
    let mass = a.sum() * b.sum();
    let scale = if mass > EPSILON { mass.sqrt().recip() } else { 1.0 };
    (1.0 - coefficient * scale).max(0.0).sqrt()
}
