//! All-pairs slope histogram.
//!
//! Every pair of samples `(i, j)` with `i < j` contributes the slope
//! `(elev(i) − elev(j)) / dist(i, j)` to a log-spaced histogram. Pairs whose
//! slope has no bin (flat, downhill, out of range) are counted in
//! `total_pairs` only.
//!
//! The parallel scan splits the outer index across rayon workers; each worker
//! fills a private [`Tally`] and the tallies are summed elementwise after the
//! parallel region, so the result matches the sequential scan exactly.
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use super::bins::BinConfiguration;
use super::pairs::{exhaustive_pair_count, pair_slope, random_pair, PairSampling, PointPair};
use crate::error::{GrandnessError, Result};
use crate::grid::ElevationGrid;

/// Random sampling is split into this many independently seeded chunks so the
/// drawn pairs do not depend on the number of worker threads.
const RANDOM_CHUNKS: u64 = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanMode {
    Sequential,
    /// Rayon fork-join scan; falls back to sequential without the
    /// `threading` feature.
    #[default]
    Parallel,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScanConfig {
    pub bins: BinConfiguration,
    pub sampling: PairSampling,
    pub mode: ScanMode,
}

impl ScanConfig {
    pub fn validate(&self) -> Result<()> {
        self.bins.validate()?;
        if let PairSampling::Random { pairs: 0, .. } = self.sampling {
            return Err(GrandnessError::ZeroSamplePairs);
        }
        Ok(())
    }
}

/// Result of a slope scan.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlopeHistogram {
    /// One counter per bin, index 0 = shallowest.
    pub counts: Vec<u64>,
    /// Pairs evaluated, counted or not.
    pub total_pairs: u64,
    /// Largest finite positive slope seen; 0 when there was none.
    pub max_slope: f64,
    pub width: usize,
    pub height: usize,
    pub bins: BinConfiguration,
    pub sampling: PairSampling,
}

impl SlopeHistogram {
    /// Number of samples in the scanned grid.
    pub fn sample_count(&self) -> usize {
        self.width * self.height
    }

    pub fn counted_pairs(&self) -> u64 {
        self.counts.iter().sum()
    }

    pub fn discarded_pairs(&self) -> u64 {
        self.total_pairs - self.counted_pairs()
    }

    /// Factor bringing counts up to the full pair set: 1 for an exhaustive
    /// scan, `n(n−1)/2 / total_pairs` for a random one.
    pub fn density_scale(&self) -> f64 {
        if self.total_pairs == 0 {
            return 1.0;
        }
        exhaustive_pair_count(self.sample_count()) as f64 / self.total_pairs as f64
    }

    /// Per-bin `count · scale / N²`. All zero for an empty grid.
    pub fn densities(&self) -> Vec<f64> {
        let n = self.sample_count() as f64;
        if n == 0.0 {
            return vec![0.0; self.counts.len()];
        }
        let norm = self.density_scale() / (n * n);
        self.counts.iter().map(|&c| c as f64 * norm).collect()
    }
}

/// Per-worker accumulator.
#[derive(Debug, Clone)]
struct Tally {
    counts: Vec<u64>,
    pairs: u64,
    max_slope: f64,
}

impl Tally {
    fn new(bin_count: usize) -> Self {
        Self {
            counts: vec![0; bin_count],
            pairs: 0,
            max_slope: 0.0,
        }
    }

    #[inline]
    fn record(&mut self, bins: &BinConfiguration, slope: f64) {
        self.pairs += 1;
        if slope.is_finite() && slope > self.max_slope {
            self.max_slope = slope;
        }
        if let Some(k) = bins.bin_index(slope) {
            self.counts[k] += 1;
        }
    }

    fn merge(mut self, other: Tally) -> Tally {
        for (a, b) in self.counts.iter_mut().zip(other.counts) {
            *a += b;
        }
        self.pairs += other.pairs;
        self.max_slope = self.max_slope.max(other.max_slope);
        self
    }
}

/// Compute the slope histogram of `grid`.
///
/// Fails only on an invalid `config`; an empty grid gives an all-zero
/// histogram.
pub fn compute_slope_histogram(grid: &ElevationGrid, config: &ScanConfig) -> Result<SlopeHistogram> {
    config.validate()?;
    grid.validate()?;

    let bins = &config.bins;
    let n = grid.len();
    tracing::debug!(
        width = grid.width,
        height = grid.height,
        bins = bins.bin_count,
        mode = ?config.mode,
        "starting slope scan"
    );

    let tally = match (config.sampling, config.mode) {
        (PairSampling::Exhaustive, ScanMode::Sequential) => scan_exhaustive_sequential(grid, bins),
        (PairSampling::Exhaustive, ScanMode::Parallel) => scan_exhaustive_parallel(grid, bins),
        (PairSampling::Random { pairs, seed }, mode) if n >= 2 => {
            scan_random(grid, bins, pairs, seed, mode)
        }
        (PairSampling::Random { .. }, _) => Tally::new(bins.bin_count),
    };

    let histogram = SlopeHistogram {
        counts: tally.counts,
        total_pairs: tally.pairs,
        max_slope: tally.max_slope,
        width: grid.width,
        height: grid.height,
        bins: *bins,
        sampling: config.sampling,
    };
    tracing::debug!(
        total_pairs = histogram.total_pairs,
        counted = histogram.counted_pairs(),
        max_slope = histogram.max_slope,
        "slope scan finished"
    );
    Ok(histogram)
}

/// Every target paired with source `i`.
#[inline]
fn scan_source(grid: &ElevationGrid, bins: &BinConfiguration, i: usize, tally: &mut Tally) {
    for j in i + 1..grid.len() {
        let slope = pair_slope(grid, PointPair { source: i, target: j });
        tally.record(bins, slope);
    }
}

fn scan_exhaustive_sequential(grid: &ElevationGrid, bins: &BinConfiguration) -> Tally {
    let mut tally = Tally::new(bins.bin_count);
    for i in 0..grid.len() {
        scan_source(grid, bins, i, &mut tally);
    }
    tally
}

#[cfg(feature = "threading")]
fn scan_exhaustive_parallel(grid: &ElevationGrid, bins: &BinConfiguration) -> Tally {
    use rayon::prelude::*;

    // Work per source shrinks linearly with i; rayon's adaptive splitting and
    // work stealing keep the workers balanced.
    (0..grid.len())
        .into_par_iter()
        .fold(
            || Tally::new(bins.bin_count),
            |mut tally, i| {
                scan_source(grid, bins, i, &mut tally);
                tally
            },
        )
        .reduce(|| Tally::new(bins.bin_count), Tally::merge)
}

#[cfg(not(feature = "threading"))]
fn scan_exhaustive_parallel(grid: &ElevationGrid, bins: &BinConfiguration) -> Tally {
    scan_exhaustive_sequential(grid, bins)
}

/// Draws for chunk `k` of `total`, spreading the remainder over the first chunks.
fn chunk_draws(total: u64, k: u64) -> u64 {
    total / RANDOM_CHUNKS + u64::from(k < total % RANDOM_CHUNKS)
}

fn scan_chunk(grid: &ElevationGrid, bins: &BinConfiguration, draws: u64, seed: u64, k: u64) -> Tally {
    let mut rng = StdRng::seed_from_u64(seed ^ k.wrapping_mul(0x9E37_79B9_7F4A_7C15));
    let mut tally = Tally::new(bins.bin_count);
    let n = grid.len();
    for _ in 0..draws {
        let pair = random_pair(&mut rng, n);
        tally.record(bins, pair_slope(grid, pair));
    }
    tally
}

fn scan_random(
    grid: &ElevationGrid,
    bins: &BinConfiguration,
    pairs: u64,
    seed: u64,
    mode: ScanMode,
) -> Tally {
    let run = |k: u64| scan_chunk(grid, bins, chunk_draws(pairs, k), seed, k);

    #[cfg(feature = "threading")]
    {
        use rayon::prelude::*;
        if mode == ScanMode::Parallel {
            return (0..RANDOM_CHUNKS)
                .into_par_iter()
                .map(run)
                .reduce(|| Tally::new(bins.bin_count), Tally::merge);
        }
    }
    #[cfg(not(feature = "threading"))]
    let _ = mode;

    (0..RANDOM_CHUNKS)
        .map(run)
        .fold(Tally::new(bins.bin_count), Tally::merge)
}
