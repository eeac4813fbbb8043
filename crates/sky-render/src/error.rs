//! Error types for the worker engine.

use thiserror::Error;

/// Result type for rendering operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// Errors that can occur inside the worker engine.
///
/// Worker failures are reported back to the orchestrator as structured
/// events carrying these errors' messages; they are never allowed to
/// panic across a thread boundary.
#[derive(Debug, Error)]
pub enum RenderError {
    /// A raster operation failed (bad window, size mismatch).
    #[error(transparent)]
    Ops(#[from] sky_ops::OpsError),

    /// A core buffer operation failed.
    #[error(transparent)]
    Core(#[from] sky_core::Error),

    /// Encoding the preview blob failed.
    #[error("png encoding failed: {0}")]
    Encode(#[from] png::EncodingError),

    /// A command addressed a channel that is not registered.
    #[error("unknown channel {0}")]
    UnknownChannel(crate::store::ChannelId),

    /// A worker's message channel disconnected.
    #[error("worker channel disconnected")]
    Disconnected,
}
