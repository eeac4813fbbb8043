//! Error types for sky-core operations.
//!
//! The [`Error`] enum covers the failure modes shared across the rendering
//! pipeline: bad intensity windows, channel buffers that disagree with the
//! composite's pixel count, and invalid raster dimensions.

use thiserror::Error;

/// Result type alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while preparing or rendering rasters.
#[derive(Debug, Error)]
pub enum Error {
    /// Intensity window with `high <= low`.
    ///
    /// The scale factor `255 / (high - low)` is undefined or negative, so
    /// the pass is skipped instead of propagating non-finite values into
    /// pixel buffers. Recoverable: the previous display is retained and the
    /// next window attempt proceeds normally.
    #[error("invalid scale window: [{low}, {high}] (high must be greater than low)")]
    InvalidScaleWindow {
        /// Lower clip bound
        low: f32,
        /// Upper clip bound
        high: f32,
    },

    /// A channel's buffer length disagrees with the composite pixel count.
    ///
    /// Recoverable: the channel store reallocates the mismatched buffer at
    /// its new size (clearing its content) rather than aborting the whole
    /// composite.
    #[error("channel buffer length {got} does not match composite pixel count {expected}")]
    ChannelSizeMismatch {
        /// Pixel count the composite expects
        expected: usize,
        /// Actual buffer length
        got: usize,
    },

    /// Invalid raster dimensions.
    ///
    /// Returned when width or height is zero, or dimensions would overflow
    /// buffer size calculations.
    #[error("invalid dimensions: {width}x{height} ({reason})")]
    InvalidDimensions {
        /// Requested width
        width: u32,
        /// Requested height
        height: u32,
        /// Reason why dimensions are invalid
        reason: String,
    },

    /// Pixel coordinates are outside raster bounds.
    #[error("pixel ({x}, {y}) out of bounds for raster {width}x{height}")]
    OutOfBounds {
        /// X coordinate that was out of bounds
        x: u32,
        /// Y coordinate that was out of bounds
        y: u32,
        /// Raster width
        width: u32,
        /// Raster height
        height: u32,
    },

    /// Generic error with custom message.
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Creates an [`Error::InvalidScaleWindow`] error.
    #[inline]
    pub fn invalid_scale_window(low: f32, high: f32) -> Self {
        Self::InvalidScaleWindow { low, high }
    }

    /// Creates an [`Error::ChannelSizeMismatch`] error.
    #[inline]
    pub fn channel_size_mismatch(expected: usize, got: usize) -> Self {
        Self::ChannelSizeMismatch { expected, got }
    }

    /// Creates an [`Error::InvalidDimensions`] error.
    #[inline]
    pub fn invalid_dimensions(width: u32, height: u32, reason: impl Into<String>) -> Self {
        Self::InvalidDimensions {
            width,
            height,
            reason: reason.into(),
        }
    }

    /// Creates an [`Error::OutOfBounds`] error.
    #[inline]
    pub fn out_of_bounds(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self::OutOfBounds {
            x,
            y,
            width,
            height,
        }
    }

    /// Creates an [`Error::Other`] error.
    #[inline]
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }

    /// Returns `true` if the pipeline can continue after this error by
    /// skipping or retrying the affected pass.
    #[inline]
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::InvalidScaleWindow { .. } | Self::ChannelSizeMismatch { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_scale_window() {
        let err = Error::invalid_scale_window(100.0, 100.0);
        assert!(err.to_string().contains("100"));
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_channel_size_mismatch() {
        let err = Error::channel_size_mismatch(1024, 256);
        let msg = err.to_string();
        assert!(msg.contains("1024"));
        assert!(msg.contains("256"));
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_invalid_dimensions_not_recoverable() {
        let err = Error::invalid_dimensions(0, 100, "width must be > 0");
        assert!(!err.is_recoverable());
    }
}
