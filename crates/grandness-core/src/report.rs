//! Histogram report: bin midpoint and normalised frequency per bin.
use std::fmt;
use std::io::{self, Write};

use serde::Serialize;

use crate::slope::engine::SlopeHistogram;

/// `# grandness v<crate version>`.
pub fn banner() -> String {
    format!("# grandness v{}", env!("CARGO_PKG_VERSION"))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    /// Geometric midpoint of the bin's slope interval.
    pub slope: f64,
    /// `count · scale / N²`.
    pub density: f64,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub version: String,
    pub width: usize,
    pub height: usize,
    pub total_pairs: u64,
    pub counted_pairs: u64,
    pub max_slope: f64,
    /// One row per bin in increasing bin order; empty for an empty grid.
    pub bins: Vec<ReportRow>,
}

impl Report {
    pub fn from_histogram(hist: &SlopeHistogram) -> Self {
        let bins = if hist.sample_count() == 0 {
            Vec::new()
        } else {
            hist.bins
                .midpoints()
                .into_iter()
                .zip(hist.densities())
                .zip(&hist.counts)
                .map(|((slope, density), &count)| ReportRow { slope, density, count })
                .collect()
        };
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            width: hist.width,
            height: hist.height,
            total_pairs: hist.total_pairs,
            counted_pairs: hist.counted_pairs(),
            max_slope: hist.max_slope,
            bins,
        }
    }

    pub fn write_text<W: Write>(&self, out: &mut W) -> io::Result<()> {
        write!(out, "{self}")
    }

    pub fn to_text(&self) -> String {
        self.to_string()
    }
}

/// Banner line, then `"<slope> <density>"` per bin.
impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", banner())?;
        for row in &self.bins {
            writeln!(f, "{} {}", row.slope, row.density)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::ElevationGrid;
    use crate::slope::{compute_slope_histogram, BinConfiguration, ScanConfig};

    #[test]
    fn text_report_has_banner_and_one_line_per_bin() {
        let grid = ElevationGrid::from_rows(&[vec![2.0, 0.0], vec![0.0, 0.0]]).unwrap();
        let hist = compute_slope_histogram(&grid, &ScanConfig::default()).unwrap();
        let text = Report::from_histogram(&hist).to_text();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], banner());
        assert!(lines[0].starts_with("# grandness v"));
        assert_eq!(lines.len(), 101);

        let bins = BinConfiguration::default();
        let k = bins.bin_index(2.0).unwrap();
        let fields: Vec<f64> = lines[k + 1].split_whitespace().map(|f| f.parse().unwrap()).collect();
        assert_eq!(fields, vec![bins.midpoint(k), 2.0 / 16.0]);
    }

    #[test]
    fn written_text_matches_display() {
        let grid = ElevationGrid::from_rows(&[vec![3.0, 1.0], vec![0.5, 0.0]]).unwrap();
        let hist = compute_slope_histogram(&grid, &ScanConfig::default()).unwrap();
        let report = Report::from_histogram(&hist);
        let mut buf = Vec::new();
        report.write_text(&mut buf).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), report.to_text());
        assert_eq!(report.to_text().lines().count(), 101);
    }

    #[test]
    fn empty_grid_reports_banner_only() {
        let hist = compute_slope_histogram(&ElevationGrid::empty(), &ScanConfig::default()).unwrap();
        let report = Report::from_histogram(&hist);
        assert!(report.bins.is_empty());
        assert_eq!(report.to_text(), format!("{}\n", banner()));
    }

    #[test]
    fn json_report_carries_summary_fields() {
        let grid = ElevationGrid::from_rows(&[vec![1.0, 0.0, 0.0]]).unwrap();
        let hist = compute_slope_histogram(&grid, &ScanConfig::default()).unwrap();
        let json = serde_json::to_value(Report::from_histogram(&hist)).unwrap();
        assert_eq!(json["width"], 3);
        assert_eq!(json["total_pairs"], 3);
        assert_eq!(json["counted_pairs"], 2);
        assert_eq!(json["max_slope"], 1.0);
        assert_eq!(json["bins"].as_array().unwrap().len(), 100);
    }
}
