//! Error types for the geocell index.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, GeocellError>;

#[derive(Debug, Error)]
pub enum GeocellError {
    /// Malformed coordinates, distances, boxes or configuration.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("resolution {resolution} exceeds the supported maximum of {max}")]
    InvalidResolution { resolution: usize, max: usize },

    #[error("invalid geocell: {0}")]
    InvalidGeocell(String),

    /// Failure reported by the point store adapter, passed through untouched.
    #[error("point store error: {0}")]
    Store(String),

    #[error("point not found: {0}")]
    PointNotFound(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
