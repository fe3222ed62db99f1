//! Error type shared by every pipeline stage.
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for projection runs.
#[derive(Error, Debug)]
pub enum ProjectionError {
    /// Malformed input: missing columns, non-numeric counts, bad dates.
    #[error("invalid data format: {0}")]
    DataFormat(String),

    /// No usable rows for the target country.
    #[error("no usable vaccination rows for country {country}")]
    EmptySeries { country: String },

    /// Regression needs at least two points with two distinct x values.
    #[error("insufficient data for regression (points: {points}, distinct x: {distinct})")]
    InsufficientData { points: usize, distinct: usize },

    /// File read/write failure on the data, log, export or image files.
    #[error("i/o error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Download of the raw feed failed.
    #[error("fetch failed: {0}")]
    Fetch(String),

    /// Chart drawing failed (including missing fonts).
    #[error("failed to render chart: {0}")]
    Render(String),

    /// Invalid configuration value or unreadable configuration file.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl ProjectionError {
    /// Wrap an `io::Error` with the path it happened on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ProjectionError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Type alias for Results using ProjectionError
pub type Result<T> = std::result::Result<T, ProjectionError>;
