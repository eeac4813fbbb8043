//! Registry of scaled channel buffers feeding the compositor.

use sky_core::{BandColor, Dims, SharedBuffer};
use tracing::{debug, warn};

use crate::messages::CompositeInput;

/// Stable identity of a registered channel.
///
/// Identifiers are allocated monotonically and never reused, so a late
/// event from a worker whose channel was cleared can always be told apart
/// from one addressing a current channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChannelId(pub(crate) u64);

impl ChannelId {
    /// Raw numeric identity, for logging.
    pub fn raw(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for ChannelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ch{}", self.0)
    }
}

#[derive(Debug)]
struct Channel {
    id: ChannelId,
    buffer: SharedBuffer,
    color: BandColor,
    fresh: bool,
}

/// Holds one shared grayscale buffer per registered channel, in
/// registration order, together with its composite color weights and a
/// freshness flag set when its scaler reports new content.
#[derive(Debug)]
pub struct ChannelStore {
    dims: Dims,
    channels: Vec<Channel>,
    next_id: u64,
}

impl ChannelStore {
    /// Creates an empty store for composites of the given dimensions.
    pub fn new(dims: Dims) -> Self {
        Self { dims, channels: Vec::new(), next_id: 0 }
    }

    /// Composite dimensions all channel buffers are sized for.
    pub fn dims(&self) -> Dims {
        self.dims
    }

    /// Number of registered channels.
    pub fn len(&self) -> usize {
        self.channels.len()
    }

    /// True if no channels are registered.
    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Registers a channel, allocating its zeroed shared buffer.
    pub fn register(&mut self, color: BandColor) -> ChannelId {
        let id = ChannelId(self.next_id);
        self.next_id += 1;
        self.channels.push(Channel {
            id,
            buffer: SharedBuffer::new(self.dims.pixel_count()),
            color,
            fresh: false,
        });
        debug!(%id, ?color, "registered channel");
        id
    }

    /// Drops every channel. Identifiers are not reused afterwards.
    pub fn clear(&mut self) {
        debug!(count = self.channels.len(), "clearing channel store");
        self.channels.clear();
    }

    /// True if `id` names a currently registered channel.
    pub fn contains(&self, id: ChannelId) -> bool {
        self.channels.iter().any(|c| c.id == id)
    }

    /// The shared buffer backing `id`, if registered.
    pub fn buffer(&self, id: ChannelId) -> Option<SharedBuffer> {
        self.channels.iter().find(|c| c.id == id).map(|c| c.buffer.clone())
    }

    /// The composite color of `id`, if registered.
    pub fn color(&self, id: ChannelId) -> Option<BandColor> {
        self.channels.iter().find(|c| c.id == id).map(|c| c.color)
    }

    /// Replaces the buffer behind `id` with a zeroed one of `len` samples.
    ///
    /// Used to recover when a channel's raw data arrives at a different
    /// size than expected; the old content is discarded, not copied.
    /// Returns the new buffer, or `None` for an unknown channel.
    pub fn reallocate(&mut self, id: ChannelId, len: usize) -> Option<SharedBuffer> {
        let channel = self.channels.iter_mut().find(|c| c.id == id)?;
        warn!(%id, old = channel.buffer.len(), new = len, "reallocating channel buffer");
        channel.buffer = SharedBuffer::new(len);
        channel.fresh = false;
        Some(channel.buffer.clone())
    }

    /// Marks `id` as holding content not yet folded into a composite.
    /// A stale identifier is ignored.
    pub fn mark_fresh(&mut self, id: ChannelId) {
        if let Some(channel) = self.channels.iter_mut().find(|c| c.id == id) {
            channel.fresh = true;
        }
    }

    /// Clears every freshness flag, returning the ids that were fresh.
    pub fn consume_fresh(&mut self) -> Vec<ChannelId> {
        let mut fresh = Vec::new();
        for channel in &mut self.channels {
            if channel.fresh {
                channel.fresh = false;
                fresh.push(channel.id);
            }
        }
        fresh
    }

    /// True if any channel holds content not yet composited.
    pub fn any_fresh(&self) -> bool {
        self.channels.iter().any(|c| c.fresh)
    }

    /// Snapshot of every channel as compositor input, in registration order.
    pub fn composite_inputs(&self) -> Vec<CompositeInput> {
        self.channels
            .iter()
            .map(|c| CompositeInput {
                id: c.id,
                buffer: c.buffer.clone(),
                color: c.color,
            })
            .collect()
    }
}
