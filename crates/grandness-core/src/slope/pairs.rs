//! Point pairs and the strategies for choosing which pairs to evaluate.
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::grid::ElevationGrid;

/// An unordered pair of distinct linear grid indices, stored with
/// `source < target`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PointPair {
    pub source: usize,
    pub target: usize,
}

impl PointPair {
    /// Order two indices into a pair. `None` for a self-pair.
    pub fn new(a: usize, b: usize) -> Option<Self> {
        match a.cmp(&b) {
            std::cmp::Ordering::Less => Some(Self { source: a, target: b }),
            std::cmp::Ordering::Greater => Some(Self { source: b, target: a }),
            std::cmp::Ordering::Equal => None,
        }
    }
}

/// Which pairs a scan evaluates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PairSampling {
    /// Every unordered pair exactly once.
    #[default]
    Exhaustive,
    /// `pairs` uniformly drawn pairs (with replacement), reproducible from `seed`.
    Random { pairs: u64, seed: u64 },
}

/// `n(n−1)/2`, the size of the full pair set over `n` samples.
pub fn exhaustive_pair_count(n: usize) -> u64 {
    let n = n as u64;
    n * n.saturating_sub(1) / 2
}

/// Signed slope from `pair.source` to `pair.target`:
/// `(elev(source) − elev(target)) / planar distance`, distance in grid cells.
#[inline]
pub fn pair_slope(grid: &ElevationGrid, pair: PointPair) -> f64 {
    let (rs, cs) = grid.coords(pair.source);
    let (rt, ct) = grid.coords(pair.target);
    let d_elev = grid.data[pair.source] as f64 - grid.data[pair.target] as f64;
    let dr = rt as f64 - rs as f64;
    let dc = ct as f64 - cs as f64;
    d_elev / (dr * dr + dc * dc).sqrt()
}

/// Draw one uniformly distributed unordered pair over `n ≥ 2` samples.
pub fn random_pair<R: Rng + ?Sized>(rng: &mut R, n: usize) -> PointPair {
    let a = rng.gen_range(0..n);
    let mut b = rng.gen_range(0..n - 1);
    if b >= a {
        b += 1;
    }
    if a < b {
        PointPair { source: a, target: b }
    } else {
        PointPair { source: b, target: a }
    }
}
