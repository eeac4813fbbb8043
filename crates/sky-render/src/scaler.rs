//! Per-band scaler worker.
//!
//! One scaler thread per registered channel. It holds the band's raw
//! floating-point data and rescales it whenever a new intensity window
//! arrives, writing the result into the channel's shared buffer (or, in
//! preview mode, encoding a PNG into the completion event).
//!
//! Window requests go through a latest-wins [`Mailbox`]: a pass only ever
//! runs against the newest requested window, and requests that arrive
//! while a pass is queued simply replace the pending one. A pass runs only
//! once the surface, the raw data, and a window are all present; until
//! then requests stay pending.

use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::JoinHandle;

use sky_core::{Error as CoreError, FrameBuffer, SharedBuffer};
use sky_lut::GammaTable;
use sky_ops::ScaleWindow;
use sky_ops::scale::{gray_to_rgba, scale_band};
use tracing::{debug, trace, warn};

use crate::error::RenderResult;
use crate::mailbox::Mailbox;
use crate::messages::{Generation, RenderEvent, ScalerMsg};
use crate::store::ChannelId;
use crate::surface::encode_png;

/// Run loop state for one band scaler.
pub struct ScalerHandler {
    channel: ChannelId,
    rx: Receiver<ScalerMsg>,
    events: Sender<RenderEvent>,
    gamma: GammaTable,
    frame: Option<FrameBuffer>,
    shared: Option<SharedBuffer>,
    raw: Option<Arc<[f32]>>,
    pending: Mailbox<(ScaleWindow, Generation)>,
}

impl ScalerHandler {
    /// Spawns a scaler thread, returning its command sender and handle.
    pub fn spawn(
        channel: ChannelId,
        events: Sender<RenderEvent>,
        gamma: GammaTable,
    ) -> (Sender<ScalerMsg>, JoinHandle<()>) {
        let (tx, rx) = mpsc::channel();
        let handler = Self {
            channel,
            rx,
            events,
            gamma,
            frame: None,
            shared: None,
            raw: None,
            pending: Mailbox::new(),
        };
        let handle = std::thread::spawn(move || handler.run());
        (tx, handle)
    }

    /// Processes commands until [`ScalerMsg::Close`] or disconnect.
    pub fn run(mut self) {
        debug!(channel = %self.channel, "scaler started");
        'outer: while let Ok(msg) = self.rx.recv() {
            if self.apply(msg) {
                break;
            }
            // Collapse any queued burst before doing pixel work, so a
            // dragged slider costs one pass, not one per tick.
            while let Ok(msg) = self.rx.try_recv() {
                if self.apply(msg) {
                    break 'outer;
                }
            }
            self.pass();
        }
        debug!(channel = %self.channel, "scaler stopped");
    }

    /// Applies one command. Returns `true` on close.
    fn apply(&mut self, msg: ScalerMsg) -> bool {
        match msg {
            ScalerMsg::Attach { dims, shared } => {
                trace!(channel = %self.channel, ?dims, shared = shared.is_some(), "attach");
                self.frame = Some(FrameBuffer::new(dims));
                self.shared = shared;
            }
            ScalerMsg::SetRawData(raw) => {
                trace!(channel = %self.channel, len = raw.len(), "raw data replaced");
                self.raw = Some(raw);
            }
            ScalerMsg::SetWindow { window, generation } => {
                self.pending.post((window, generation));
            }
            ScalerMsg::Close => return true,
        }
        false
    }

    /// Runs a scale pass if the worker is ready and a window is pending.
    fn pass(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        let Some(raw) = self.raw.clone() else { return };
        let Some(mut frame) = self.frame.take() else { return };
        let Some((window, generation)) = self.pending.take() else {
            self.frame = Some(frame);
            return;
        };

        let outcome = self.scale_into(&raw, window, generation, &mut frame);
        self.frame = Some(frame);

        match outcome {
            Ok(event) => {
                let _ = self.events.send(event);
            }
            Err(err) => {
                // Previous display output stays as-is; report and move on.
                warn!(channel = %self.channel, %err, "scale pass failed");
                let _ = self.events.send(RenderEvent::ScalerError {
                    channel: self.channel,
                    message: err.to_string(),
                });
            }
        }
    }

    fn scale_into(
        &self,
        raw: &[f32],
        window: ScaleWindow,
        generation: Generation,
        frame: &mut FrameBuffer,
    ) -> RenderResult<RenderEvent> {
        trace!(channel = %self.channel, generation, ?window, "scale pass");
        let gray = scale_band(raw, window, &self.gamma)?;
        gray_to_rgba(&gray, frame)?;

        if let Some(shared) = &self.shared {
            if shared.len() != gray.len() {
                return Err(CoreError::channel_size_mismatch(shared.len(), gray.len()).into());
            }
            shared.write_from(&gray);
            Ok(RenderEvent::ChannelUpdated {
                channel: self.channel,
                generation,
            })
        } else {
            let png = encode_png(frame)?;
            Ok(RenderEvent::Preview {
                channel: self.channel,
                png,
                generation,
            })
        }
    }
}
