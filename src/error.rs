use thiserror::Error;

#[derive(Error, Debug)]
pub enum ShedError {
    #[error("Series is empty")]
    EmptySeries,

    #[error("Axis must be strictly increasing: sample {index} has {next} after {prev}")]
    NonIncreasingAxis { index: usize, prev: f64, next: f64 },

    #[error("Axis and value lengths differ: {axis} vs {values}")]
    LengthMismatch { axis: usize, values: usize },

    #[error("Detection policy error: {0}")]
    Policy(String),

    #[error("Trailing window must cover at least 2 peaks, got {0}")]
    TrailingWindow(usize),

    #[error("Malformed CSV data: {0}")]
    MalformedData(String),

    #[error("No profile samples at or beyond x = {0}")]
    EmptySearchRegion(f64),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[cfg(feature = "plot")]
    #[error("Plot rendering failed: {0}")]
    Render(String),
}

pub type Result<T> = std::result::Result<T, ShedError>;
