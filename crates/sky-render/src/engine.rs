//! Orchestration of the scaler and compositor workers.

use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::JoinHandle;
use std::time::Duration;

use sky_core::{BandColor, Dims, filter_color};
use sky_lut::GammaTable;
use sky_ops::ScaleWindow;
use tracing::{debug, info, warn};

use crate::compositor::CompositorHandler;
use crate::config::RenderConfig;
use crate::error::{RenderError, RenderResult};
use crate::messages::{CompositorMsg, Generation, RenderEvent, ScalerMsg};
use crate::scaler::ScalerHandler;
use crate::store::{ChannelId, ChannelStore};

struct ScalerLink {
    id: ChannelId,
    tx: Sender<ScalerMsg>,
    handle: Option<JoinHandle<()>>,
}

/// The multi-channel rendering engine.
///
/// Owns one compositor worker and one scaler worker per registered
/// channel, plus the [`ChannelStore`] of shared buffers linking them.
/// Callers feed raw bands and intensity windows in, and drain rendered
/// frames and errors out via [`Engine::poll`].
///
/// # Example
///
/// ```rust,no_run
/// use std::time::Duration;
/// use sky_core::{BandColor, Dims};
/// use sky_render::{Engine, RenderConfig, RenderEvent};
/// use sky_ops::ScaleWindow;
///
/// let dims = Dims::new(64, 64).unwrap();
/// let mut engine = Engine::new(dims, RenderConfig::default());
/// let red = engine.register_channel(BandColor::RED);
/// engine.set_raw_band(red, dims, vec![500.0; dims.pixel_count()]).unwrap();
/// engine.set_scale_window(red, ScaleWindow::new(0.0, 1000.0).unwrap()).unwrap();
/// for event in engine.poll(Duration::from_millis(100)) {
///     if let RenderEvent::FrameReady { frame } = event {
///         assert_eq!(frame.dims(), dims);
///     }
/// }
/// ```
pub struct Engine {
    config: RenderConfig,
    gamma: GammaTable,
    store: ChannelStore,
    generation: Generation,
    events_tx: Sender<RenderEvent>,
    events_rx: Receiver<RenderEvent>,
    scalers: Vec<ScalerLink>,
    compositor_tx: Sender<CompositorMsg>,
    compositor: Option<JoinHandle<()>>,
}

impl Engine {
    /// Creates an engine for composites of the given dimensions and spawns
    /// its compositor worker.
    pub fn new(dims: Dims, config: RenderConfig) -> Self {
        let gamma = config.gamma_table();
        let (events_tx, events_rx) = mpsc::channel();
        let (compositor_tx, compositor) =
            CompositorHandler::spawn(events_tx.clone(), gamma.clone());
        let _ = compositor_tx.send(CompositorMsg::Attach { dims });
        info!(?dims, gamma = config.gamma, "engine started");
        Self {
            config,
            gamma,
            store: ChannelStore::new(dims),
            generation: 0,
            events_tx,
            events_rx,
            scalers: Vec::new(),
            compositor_tx,
            compositor: Some(compositor),
        }
    }

    /// Composite dimensions.
    pub fn dims(&self) -> Dims {
        self.store.dims()
    }

    /// The configuration this engine was built with.
    pub fn config(&self) -> RenderConfig {
        self.config
    }

    /// Number of registered channels.
    pub fn channel_count(&self) -> usize {
        self.store.len()
    }

    /// Registers a channel with the given composite color and spawns its
    /// scaler worker.
    pub fn register_channel(&mut self, color: BandColor) -> ChannelId {
        let id = self.store.register(color);
        let (tx, handle) = ScalerHandler::spawn(id, self.events_tx.clone(), self.gamma.clone());
        let _ = tx.send(ScalerMsg::Attach {
            dims: self.store.dims(),
            shared: self.store.buffer(id),
        });
        self.scalers.push(ScalerLink { id, tx, handle: Some(handle) });
        self.sync_compositor();
        id
    }

    /// Registers a channel colored by its photometric filter name.
    ///
    /// Returns `None` for filters with no display color mapping.
    pub fn register_filter(&mut self, filter: &str) -> Option<ChannelId> {
        filter_color(filter).map(|color| self.register_channel(color))
    }

    /// Replaces the raw band data of a channel.
    ///
    /// `dims` are the band's own dimensions; `raw.len()` must match their
    /// pixel count. A band whose size disagrees with the composite gets its
    /// shared buffer reallocated (content cleared) and is left out of
    /// composites until the sizes agree again.
    pub fn set_raw_band(&mut self, id: ChannelId, dims: Dims, raw: Vec<f32>) -> RenderResult<()> {
        if raw.len() != dims.pixel_count() {
            return Err(sky_core::Error::invalid_dimensions(
                dims.width,
                dims.height,
                format!("expected {} samples, got {}", dims.pixel_count(), raw.len()),
            )
            .into());
        }
        let buffer = self.store.buffer(id).ok_or(RenderError::UnknownChannel(id))?;
        let scaler = self
            .scalers
            .iter()
            .find(|s| s.id == id)
            .ok_or(RenderError::UnknownChannel(id))?;

        if buffer.len() != raw.len() {
            warn!(channel = %id, expected = buffer.len(), got = raw.len(), "band size mismatch");
            let replacement = self
                .store
                .reallocate(id, raw.len())
                .ok_or(RenderError::UnknownChannel(id))?;
            let _ = scaler.tx.send(ScalerMsg::Attach {
                dims,
                shared: Some(replacement),
            });
            self.sync_compositor();
        }

        let _ = scaler.tx.send(ScalerMsg::SetRawData(Arc::from(raw)));
        Ok(())
    }

    /// Requests a rescale of one channel with a new intensity window.
    ///
    /// Returns the generation assigned to the request. Requests issued
    /// faster than passes complete are superseded; only the newest window
    /// is ever rendered.
    pub fn set_scale_window(
        &mut self,
        id: ChannelId,
        window: ScaleWindow,
    ) -> RenderResult<Generation> {
        let scaler = self
            .scalers
            .iter()
            .find(|s| s.id == id)
            .ok_or(RenderError::UnknownChannel(id))?;
        self.generation += 1;
        let generation = self.generation;
        let _ = scaler.tx.send(ScalerMsg::SetWindow { window, generation });
        Ok(generation)
    }

    /// Drops every channel and stops their scaler workers.
    ///
    /// Channel identifiers are never reused, so events from the stopped
    /// workers still in flight address channels that no longer exist and
    /// are discarded on arrival.
    pub fn clear_channels(&mut self) {
        debug!(count = self.scalers.len(), "clearing channels");
        for scaler in &mut self.scalers {
            let _ = scaler.tx.send(ScalerMsg::Close);
            if let Some(handle) = scaler.handle.take() {
                let _ = handle.join();
            }
        }
        self.scalers.clear();
        self.store.clear();
        self.sync_compositor();
    }

    /// Waits up to `timeout` for worker events and drains everything
    /// already queued.
    ///
    /// Routing happens here: a completed scale pass marks its channel
    /// fresh and nudges the compositor; a completed composite clears the
    /// freshness flags it folded in. Events for channels dropped by
    /// [`Engine::clear_channels`] are discarded.
    pub fn poll(&mut self, timeout: Duration) -> Vec<RenderEvent> {
        let mut out = Vec::new();
        match self.events_rx.recv_timeout(timeout) {
            Ok(event) => self.route(event, &mut out),
            Err(_) => return out,
        }
        while let Ok(event) = self.events_rx.try_recv() {
            self.route(event, &mut out);
        }
        out
    }

    fn route(&mut self, event: RenderEvent, out: &mut Vec<RenderEvent>) {
        match &event {
            RenderEvent::ChannelUpdated { channel, .. } => {
                if !self.store.contains(*channel) {
                    debug!(channel = %channel, "discarding event for dropped channel");
                    return;
                }
                self.store.mark_fresh(*channel);
                let _ = self.compositor_tx.send(CompositorMsg::ChannelChanged(*channel));
            }
            RenderEvent::ScalerError { channel, .. } => {
                if !self.store.contains(*channel) {
                    return;
                }
            }
            RenderEvent::FrameReady { .. } => {
                let folded = self.store.consume_fresh();
                if !folded.is_empty() {
                    debug!(channels = folded.len(), "composite folded fresh channels");
                }
            }
            _ => {}
        }
        out.push(event);
    }

    fn sync_compositor(&self) {
        let _ = self
            .compositor_tx
            .send(CompositorMsg::SetChannels(self.store.composite_inputs()));
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        for scaler in &mut self.scalers {
            let _ = scaler.tx.send(ScalerMsg::Close);
            if let Some(handle) = scaler.handle.take() {
                let _ = handle.join();
            }
        }
        let _ = self.compositor_tx.send(CompositorMsg::Close);
        if let Some(handle) = self.compositor.take() {
            let _ = handle.join();
        }
    }
}

/// A standalone single-band scaler with no compositor behind it.
///
/// Runs one scaler worker in preview mode: every completed pass arrives as
/// a [`RenderEvent::Preview`] carrying a PNG blob of the scaled band.
pub struct BandPreview {
    tx: Sender<ScalerMsg>,
    events: Receiver<RenderEvent>,
    handle: Option<JoinHandle<()>>,
    generation: Generation,
}

impl BandPreview {
    /// Spawns a preview scaler for bands of the given dimensions.
    pub fn new(dims: Dims, config: RenderConfig) -> Self {
        let (events_tx, events) = mpsc::channel();
        let (tx, handle) = ScalerHandler::spawn(ChannelId(0), events_tx, config.gamma_table());
        let _ = tx.send(ScalerMsg::Attach { dims, shared: None });
        Self {
            tx,
            events,
            handle: Some(handle),
            generation: 0,
        }
    }

    /// Replaces the raw band data.
    pub fn set_raw(&self, raw: Vec<f32>) {
        let _ = self.tx.send(ScalerMsg::SetRawData(Arc::from(raw)));
    }

    /// Requests a rescale, returning the request's generation.
    pub fn set_window(&mut self, window: ScaleWindow) -> Generation {
        self.generation += 1;
        let _ = self.tx.send(ScalerMsg::SetWindow {
            window,
            generation: self.generation,
        });
        self.generation
    }

    /// Waits up to `timeout` for the next event.
    pub fn poll(&self, timeout: Duration) -> Option<RenderEvent> {
        self.events.recv_timeout(timeout).ok()
    }
}

impl Drop for BandPreview {
    fn drop(&mut self) {
        let _ = self.tx.send(ScalerMsg::Close);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}
