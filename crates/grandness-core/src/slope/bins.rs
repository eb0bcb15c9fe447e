//! Logarithmic slope-bin geometry.
//!
//! The histogram covers `log10(slope)` in `[log_low, log_high)`, split into
//! `bin_count` equal intervals. A slope maps to
//! `trunc(bin_count · (log10(slope) − log_low) / (log_high − log_low))`;
//! anything outside `[0, bin_count)` or non-finite has no bin.
use serde::{Deserialize, Serialize};

use crate::error::{GrandnessError, Result};

pub const DEFAULT_BIN_COUNT: usize = 100;
pub const DEFAULT_LOG_LOW: f64 = -3.0;
pub const DEFAULT_LOG_HIGH: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BinConfiguration {
    pub bin_count: usize,
    /// log10 of the smallest slope covered.
    pub log_low: f64,
    /// log10 of the slope where the last bin ends.
    pub log_high: f64,
}

impl Default for BinConfiguration {
    fn default() -> Self {
        Self {
            bin_count: DEFAULT_BIN_COUNT,
            log_low: DEFAULT_LOG_LOW,
            log_high: DEFAULT_LOG_HIGH,
        }
    }
}

impl BinConfiguration {
    pub fn new(bin_count: usize, log_low: f64, log_high: f64) -> Result<Self> {
        let bins = Self { bin_count, log_low, log_high };
        bins.validate()?;
        Ok(bins)
    }

    pub fn validate(&self) -> Result<()> {
        if self.bin_count == 0 {
            return Err(GrandnessError::ZeroBins);
        }
        if !self.log_low.is_finite() || !self.log_high.is_finite() || self.log_high <= self.log_low {
            return Err(GrandnessError::InvalidLogRange {
                low: self.log_low,
                high: self.log_high,
            });
        }
        Ok(())
    }

    /// Bin index for a slope, or `None` when the pair must be discarded.
    ///
    /// Zero and negative slopes give a non-finite logarithm and are dropped.
    /// Truncation is toward zero, so log-slopes less than one bin width below
    /// `log_low` still land in bin 0.
    #[inline]
    pub fn bin_index(&self, slope: f64) -> Option<usize> {
        let raw = self.bin_count as f64 * (slope.log10() - self.log_low)
            / (self.log_high - self.log_low);
        if !raw.is_finite() {
            return None;
        }
        let bin = raw.trunc();
        if bin < 0.0 || bin >= self.bin_count as f64 {
            return None;
        }
        Some(bin as usize)
    }

    /// Geometric midpoint (in slope units) of bin `k`.
    pub fn midpoint(&self, k: usize) -> f64 {
        let span = self.log_high - self.log_low;
        10f64.powf(span * (k as f64 + 0.5) / self.bin_count as f64 + self.log_low)
    }

    pub fn midpoints(&self) -> Vec<f64> {
        (0..self.bin_count).map(|k| self.midpoint(k)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn defaults_match_reference_geometry() {
        let bins = BinConfiguration::default();
        assert_eq!(bins.bin_count, 100);
        assert_eq!(bins.log_low, -3.0);
        assert_eq!(bins.log_high, 2.0);
        assert!(bins.validate().is_ok());
    }

    #[test]
    fn malformed_configurations_are_rejected() {
        assert!(matches!(BinConfiguration::new(0, -3.0, 2.0), Err(GrandnessError::ZeroBins)));
        assert!(matches!(
            BinConfiguration::new(10, 1.0, 1.0),
            Err(GrandnessError::InvalidLogRange { .. })
        ));
        assert!(matches!(
            BinConfiguration::new(10, 2.0, -3.0),
            Err(GrandnessError::InvalidLogRange { .. })
        ));
        assert!(BinConfiguration::new(10, f64::NAN, 2.0).is_err());
    }

    #[test]
    fn midpoints_increase_and_follow_formula() {
        let bins = BinConfiguration::default();
        let mids = bins.midpoints();
        assert_eq!(mids.len(), 100);
        for w in mids.windows(2) {
            assert!(w[1] > w[0]);
        }
        for (k, &m) in mids.iter().enumerate() {
            let expected = 10f64.powf(5.0 * (k as f64 + 0.5) / 100.0 - 3.0);
            assert_relative_eq!(m, expected, max_relative = 1e-12);
        }
        assert_relative_eq!(mids[0], 10f64.powf(-2.975), max_relative = 1e-12);
    }

    #[test]
    fn bin_index_edges() {
        let bins = BinConfiguration::default();
        // slope 1 → log 0 → 100 · 3 / 5 = 60
        assert_eq!(bins.bin_index(1.0), Some(60));
        assert_eq!(bins.bin_index(0.0), None);
        assert_eq!(bins.bin_index(-1.0), None);
        assert_eq!(bins.bin_index(f64::NAN), None);
        assert_eq!(bins.bin_index(100.0), None);
        assert_eq!(bins.bin_index(99.0), Some(99));
        // Below log_low by less than one bin width: truncates into bin 0.
        assert_eq!(bins.bin_index(10f64.powf(-3.01)), Some(0));
        // More than one bin width below: dropped.
        assert_eq!(bins.bin_index(10f64.powf(-3.2)), None);
    }
}
