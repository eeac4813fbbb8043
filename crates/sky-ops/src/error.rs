//! Error types for raster operations.

use thiserror::Error;

/// Error type for raster operations.
#[derive(Error, Debug)]
pub enum OpsError {
    /// Invalid dimensions specified.
    #[error("invalid dimensions: {0}")]
    InvalidDimensions(String),

    /// Buffers have incompatible sizes.
    #[error("size mismatch: {0}")]
    SizeMismatch(String),

    /// Intensity window with `high <= low` or non-finite bounds.
    #[error("invalid scale window: [{low}, {high}]")]
    InvalidScaleWindow {
        /// Lower clip bound
        low: f32,
        /// Upper clip bound
        high: f32,
    },

    /// Invalid parameter value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Result type for raster operations.
pub type OpsResult<T> = Result<T, OpsError>;
