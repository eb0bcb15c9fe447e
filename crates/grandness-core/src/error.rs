use std::path::PathBuf;

/// Errors raised before a slope scan starts: bad configuration or a grid that
/// could not be loaded.
#[derive(Debug, thiserror::Error)]
pub enum GrandnessError {
    #[error("bin count must be positive")]
    ZeroBins,

    #[error("log-slope range must be finite with high > low (low {low}, high {high})")]
    InvalidLogRange { low: f64, high: f64 },

    #[error("random pair sampling needs at least one pair")]
    ZeroSamplePairs,

    #[error("vertical scale must be finite and non-negative, got {0}")]
    InvalidVerticalScale(f32),

    #[error("grid holds {actual} samples, expected {expected} for {width}x{height}")]
    GridShape {
        width: usize,
        height: usize,
        expected: usize,
        actual: usize,
    },

    #[error("grid dimensions {width}x{height} overflow the sample count")]
    GridTooLarge { width: usize, height: usize },

    #[error("elevation source {} has zero extent ({width}x{height})", path.display())]
    EmptySource {
        path: PathBuf,
        width: usize,
        height: usize,
    },

    #[error("cannot read {}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("cannot decode image {}", path.display())]
    Image {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("cannot parse grid JSON {}", path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, GrandnessError>;
