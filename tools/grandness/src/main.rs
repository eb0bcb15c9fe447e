//! Measure the grandness of a mountain from a DEM.
//!
//! Loads an elevation image, bins the slope between every pair of samples on
//! a log scale and prints `<slope> <density>` per bin to stdout. Logs go to
//! stderr.

use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use grandness_core::slope::bins::{DEFAULT_BIN_COUNT, DEFAULT_LOG_HIGH, DEFAULT_LOG_LOW};
use grandness_core::{
    compute_slope_histogram, load_optional, BinConfiguration, PairSampling, Report, ScanConfig,
    ScanMode,
};

// ── CLI ───────────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "grandness", version, about = "Measure the grandness of a mountain from a DEM")]
struct Args {
    /// Digital elevation model (PNG or any image format; a .json grid is used
    /// as stored and ignores --vert).
    #[arg(short, long)]
    dem: Option<PathBuf>,

    /// Vertical scale of black-to-white, relative to the DEM width.
    #[arg(short = 'v', long = "vert", default_value_t = 0.1)]
    vert: f32,

    /// Write slope map to a PNG (not supported; accepted for compatibility).
    #[arg(long)]
    om: Option<PathBuf>,

    /// Number of logarithmic slope bins.
    #[arg(long, default_value_t = DEFAULT_BIN_COUNT)]
    bins: usize,

    /// log10 of the lowest slope binned.
    #[arg(long, default_value_t = DEFAULT_LOG_LOW, allow_negative_numbers = true)]
    log_low: f64,

    /// log10 of the highest slope binned.
    #[arg(long, default_value_t = DEFAULT_LOG_HIGH, allow_negative_numbers = true)]
    log_high: f64,

    /// Evaluate this many random pairs instead of every pair.
    #[arg(long)]
    sample_pairs: Option<u64>,

    /// Seed for --sample-pairs.
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Scan on a single thread.
    #[arg(long)]
    sequential: bool,

    /// Print the report as JSON.
    #[arg(long)]
    json: bool,

    /// Verbose output
    #[arg(long)]
    verbose: bool,
}

impl Args {
    fn scan_config(&self) -> Result<ScanConfig> {
        let bins = BinConfiguration::new(self.bins, self.log_low, self.log_high)
            .context("invalid bin configuration")?;
        let sampling = match self.sample_pairs {
            Some(pairs) => PairSampling::Random { pairs, seed: self.seed },
            None => PairSampling::Exhaustive,
        };
        let mode = if self.sequential { ScanMode::Sequential } else { ScanMode::Parallel };
        let config = ScanConfig { bins, sampling, mode };
        config.validate().context("invalid scan configuration")?;
        Ok(config)
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn setup_logging(verbose: bool) -> Result<()> {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("setting default subscriber failed")
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let args = Args::parse();
    setup_logging(args.verbose)?;

    if let Some(om) = &args.om {
        warn!("slope map output is not supported; ignoring --om {}", om.display());
    }

    let config = args.scan_config()?;
    let grid = load_optional(args.dem.as_deref(), args.vert).with_context(|| match &args.dem {
        Some(p) => format!("loading DEM {}", p.display()),
        None => "creating empty grid".to_string(),
    })?;
    if grid.is_empty() {
        info!("no DEM given; scanning an empty grid");
    }

    info!(
        "Scanning {} x {} samples ({:?}, {:?})",
        grid.width, grid.height, config.sampling, config.mode
    );
    let start = Instant::now();
    let histogram = compute_slope_histogram(&grid, &config).context("slope scan failed")?;
    info!(
        "Scanned {} pairs, {} binned, max slope {:.4} in {:.2?}",
        histogram.total_pairs,
        histogram.counted_pairs(),
        histogram.max_slope,
        start.elapsed()
    );

    let report = Report::from_histogram(&histogram);
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    if args.json {
        serde_json::to_writer_pretty(&mut out, &report).context("writing JSON report")?;
        writeln!(out)?;
    } else {
        report.write_text(&mut out).context("writing report")?;
    }
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_run() {
        let args = Args::try_parse_from(["grandness"]).unwrap();
        assert!(args.dem.is_none());
        assert_eq!(args.vert, 0.1);
        let config = args.scan_config().unwrap();
        assert_eq!(config.bins, BinConfiguration::default());
        assert_eq!(config.sampling, PairSampling::Exhaustive);
        assert_eq!(config.mode, ScanMode::Parallel);
    }

    #[test]
    fn short_and_long_options_parse() {
        let args = Args::try_parse_from([
            "grandness", "-d", "peak.png", "-v", "0.25", "--om", "map.png", "--bins", "50",
            "--log-low", "-4", "--log-high", "1.5", "--sample-pairs", "1000", "--seed", "7",
            "--sequential", "--json",
        ])
        .unwrap();
        assert_eq!(args.dem, Some(PathBuf::from("peak.png")));
        assert_eq!(args.vert, 0.25);
        assert_eq!(args.om, Some(PathBuf::from("map.png")));
        assert!(args.json);

        let config = args.scan_config().unwrap();
        assert_eq!(config.bins, BinConfiguration::new(50, -4.0, 1.5).unwrap());
        assert_eq!(config.sampling, PairSampling::Random { pairs: 1000, seed: 7 });
        assert_eq!(config.mode, ScanMode::Sequential);
    }

    #[test]
    fn bad_configuration_fails_before_loading() {
        let args = Args::try_parse_from(["grandness", "--log-low", "2", "--log-high", "1"]).unwrap();
        assert!(args.scan_config().is_err());
        let args = Args::try_parse_from(["grandness", "--sample-pairs", "0"]).unwrap();
        assert!(args.scan_config().is_err());
    }

    #[test]
    fn unparsable_value_is_a_usage_error() {
        let err = Args::try_parse_from(["grandness", "--vert", "steep"]).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
