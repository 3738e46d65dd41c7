//! Error types for bridge terrain reconstruction.

use thiserror::Error;

/// Errors that can occur while reading inputs or rebuilding terrain.
#[derive(Debug, Error)]
pub enum Error {
    /// Underlying file system failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A collaborator produced a record that could not be understood.
    #[error("invalid data: {0}")]
    InvalidData(String),

    /// No usable terrain sample was available to estimate an elevation.
    #[error("insufficient terrain data near ({x:.3}, {y:.3})")]
    InsufficientTerrain { x: f64, y: f64 },

    /// A configuration value is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl Error {
    pub(crate) fn invalid_data(e: impl std::fmt::Display) -> Self {
        Error::InvalidData(e.to_string())
    }
}

/// Result type for bridge terrain operations.
pub type Result<T> = std::result::Result<T, Error>;
