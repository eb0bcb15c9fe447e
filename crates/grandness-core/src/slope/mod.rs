//! Slope histogram engine: bin geometry, pair selection and the scan itself.

pub mod bins;
pub mod engine;
pub mod pairs;

pub use bins::BinConfiguration;
pub use engine::{compute_slope_histogram, ScanConfig, ScanMode, SlopeHistogram};
pub use pairs::{exhaustive_pair_count, PairSampling, PointPair};
