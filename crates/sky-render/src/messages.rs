//! Message types exchanged with the worker threads.
//!
//! Each worker owns a command receiver and an event sender; commands flow
//! from the [`Engine`](crate::Engine) to workers, events flow back on one
//! shared channel. Workers never panic across the boundary: failures
//! travel as error events.

use std::sync::Arc;

use sky_core::{BandColor, Dims, FrameBuffer, SharedBuffer};
use sky_ops::ScaleWindow;

use crate::store::ChannelId;

/// Monotonic request generation.
///
/// Bumped for every scale request so a completion event can be matched to
/// the request that produced it even after intermediate requests were
/// dropped by the latest-wins mailbox.
pub type Generation = u64;

/// Commands accepted by a band scaler worker.
#[derive(Debug)]
pub enum ScalerMsg {
    /// Binds the output surface. With a shared buffer the worker writes
    /// scaled samples there and signals completion; without one it encodes
    /// a PNG preview into each completion event instead.
    Attach {
        /// Output dimensions
        dims: Dims,
        /// Destination for scaled grayscale samples, if shared with a
        /// compositor
        shared: Option<SharedBuffer>,
    },
    /// Replaces the raw floating-point band the worker scales from.
    SetRawData(Arc<[f32]>),
    /// Requests a scale pass with a new intensity window.
    SetWindow {
        /// Clip window to apply
        window: ScaleWindow,
        /// Generation of this request
        generation: Generation,
    },
    /// Stops the worker.
    Close,
}

/// Commands accepted by the compositor worker.
#[derive(Debug)]
pub enum CompositorMsg {
    /// Allocates the composite frame at the given dimensions.
    Attach {
        /// Composite dimensions
        dims: Dims,
    },
    /// Replaces the full set of input channels.
    SetChannels(Vec<CompositeInput>),
    /// Notes that a channel's shared buffer has new content and a
    /// recomposite is due. The id is informational; every channel is
    /// re-read regardless.
    ChannelChanged(ChannelId),
    /// Stops the worker.
    Close,
}

/// One channel as seen by the compositor.
#[derive(Debug, Clone)]
pub struct CompositeInput {
    /// Stable identity of the channel
    pub id: ChannelId,
    /// Shared buffer its scaler writes into
    pub buffer: SharedBuffer,
    /// Color weights applied during compositing
    pub color: BandColor,
}

/// Events emitted by the workers.
#[derive(Debug)]
pub enum RenderEvent {
    /// A scale pass finished and the shared buffer holds the result.
    ChannelUpdated {
        /// Channel that was rescaled
        channel: ChannelId,
        /// Generation of the request that completed
        generation: Generation,
    },
    /// A scale pass finished in preview mode; the result is a PNG blob.
    Preview {
        /// Channel that was rescaled
        channel: ChannelId,
        /// Encoded PNG of the scaled band
        png: Vec<u8>,
        /// Generation of the request that completed
        generation: Generation,
    },
    /// A scale pass failed. The previously displayed result is retained.
    ScalerError {
        /// Channel whose pass failed
        channel: ChannelId,
        /// Human-readable failure description
        message: String,
    },
    /// A composite pass finished.
    FrameReady {
        /// The composited RGBA frame
        frame: FrameBuffer,
    },
    /// A composite pass failed.
    CompositorError {
        /// Human-readable failure description
        message: String,
    },
}
