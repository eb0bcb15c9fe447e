//! Terrain "grandness": the distribution of slopes between every pair of
//! samples in a digital elevation model, binned on a log10 scale.
//!
//! Pipeline: [`loader`] → [`slope::compute_slope_histogram`] → [`report`].

pub mod error;
pub mod grid;
pub mod loader;
pub mod report;
pub mod slope;

pub use error::{GrandnessError, Result};
pub use grid::ElevationGrid;
pub use loader::{load_grid, load_optional, probe_resolution};
pub use report::{banner, Report, ReportRow};
pub use slope::{
    compute_slope_histogram, BinConfiguration, PairSampling, ScanConfig, ScanMode, SlopeHistogram,
};
