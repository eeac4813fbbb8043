//! Compositor worker.
//!
//! A single thread that re-reads every registered channel's shared buffer
//! and rebuilds the full RGB composite whenever any channel reports new
//! content. Change notifications are informational only; each pass
//! snapshots and composites all channels, so a burst of notifications
//! collapses into one pass over the newest data.

use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::JoinHandle;

use sky_core::FrameBuffer;
use sky_lut::GammaTable;
use sky_ops::composite::ChannelView;
use tracing::{debug, trace, warn};

use crate::messages::{CompositeInput, CompositorMsg, RenderEvent};

/// Run loop state for the compositor.
pub struct CompositorHandler {
    rx: Receiver<CompositorMsg>,
    events: Sender<RenderEvent>,
    gamma: GammaTable,
    frame: Option<FrameBuffer>,
    channels: Vec<CompositeInput>,
    dirty: bool,
}

impl CompositorHandler {
    /// Spawns the compositor thread, returning its command sender and handle.
    pub fn spawn(
        events: Sender<RenderEvent>,
        gamma: GammaTable,
    ) -> (Sender<CompositorMsg>, JoinHandle<()>) {
        let (tx, rx) = mpsc::channel();
        let handler = Self {
            rx,
            events,
            gamma,
            frame: None,
            channels: Vec::new(),
            dirty: false,
        };
        let handle = std::thread::spawn(move || handler.run());
        (tx, handle)
    }

    /// Processes commands until [`CompositorMsg::Close`] or disconnect.
    pub fn run(mut self) {
        debug!("compositor started");
        'outer: while let Ok(msg) = self.rx.recv() {
            if self.apply(msg) {
                break;
            }
            // One pass per burst of notifications.
            while let Ok(msg) = self.rx.try_recv() {
                if self.apply(msg) {
                    break 'outer;
                }
            }
            if self.dirty {
                self.recomposite();
            }
        }
        debug!("compositor stopped");
    }

    /// Applies one command. Returns `true` on close.
    fn apply(&mut self, msg: CompositorMsg) -> bool {
        match msg {
            CompositorMsg::Attach { dims } => {
                trace!(?dims, "attach");
                self.frame = Some(FrameBuffer::new(dims));
                self.dirty = true;
            }
            CompositorMsg::SetChannels(channels) => {
                trace!(count = channels.len(), "channel set replaced");
                self.channels = channels;
                self.dirty = true;
            }
            CompositorMsg::ChannelChanged(id) => {
                trace!(channel = %id, "channel changed");
                self.dirty = true;
            }
            CompositorMsg::Close => return true,
        }
        false
    }

    /// Snapshots every channel and rebuilds the composite frame.
    fn recomposite(&mut self) {
        self.dirty = false;
        let Some(mut frame) = self.frame.take() else { return };
        let pixel_count = frame.dims().pixel_count();

        // A channel whose buffer disagrees with the frame degrades to a
        // missing band instead of blanking the whole composite.
        let mut snapshots = Vec::with_capacity(self.channels.len());
        for input in &self.channels {
            if input.buffer.len() != pixel_count {
                warn!(
                    channel = %input.id,
                    len = input.buffer.len(),
                    expected = pixel_count,
                    "skipping channel with mismatched buffer"
                );
                continue;
            }
            snapshots.push((input.buffer.snapshot(), input.color));
        }
        let views: Vec<ChannelView<'_>> = snapshots
            .iter()
            .map(|(data, color)| ChannelView::new(data, *color))
            .collect();

        match sky_ops::parallel::composite_into(&views, &self.gamma, &mut frame) {
            Ok(()) => {
                let _ = self.events.send(RenderEvent::FrameReady { frame: frame.clone() });
            }
            Err(err) => {
                warn!(%err, "composite pass failed");
                let _ = self.events.send(RenderEvent::CompositorError {
                    message: err.to_string(),
                });
            }
        }
        self.frame = Some(frame);
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use sky_core::{BandColor, Dims, SharedBuffer};

    use super::*;
    use crate::store::ChannelId;

    /// Frames from passes that predate the last command may arrive first;
    /// wait for one matching `pred`.
    fn wait_for_frame(
        events: &Receiver<RenderEvent>,
        pred: impl Fn(&FrameBuffer) -> bool,
    ) -> FrameBuffer {
        let start = std::time::Instant::now();
        let mut last: Option<FrameBuffer> = None;
        while start.elapsed() < Duration::from_secs(5) {
            match events.recv_timeout(Duration::from_millis(50)) {
                Ok(RenderEvent::FrameReady { frame }) => {
                    if pred(&frame) {
                        return frame;
                    }
                    last = Some(frame);
                }
                Ok(other) => panic!("unexpected event: {other:?}"),
                Err(_) => {}
            }
        }
        panic!("no matching frame before deadline, last seen: {last:?}");
    }

    #[test]
    fn test_composites_channels_on_change() {
        let (events_tx, events_rx) = mpsc::channel();
        let (tx, handle) = CompositorHandler::spawn(events_tx, GammaTable::identity());

        let red = SharedBuffer::new(2);
        let green = SharedBuffer::new(2);
        red.write_from(&[100, 200]);
        green.write_from(&[50, 50]);

        tx.send(CompositorMsg::Attach { dims: Dims::new(2, 1).unwrap() }).unwrap();
        tx.send(CompositorMsg::SetChannels(vec![
            CompositeInput { id: ChannelId(0), buffer: red, color: BandColor::RED },
            CompositeInput { id: ChannelId(1), buffer: green, color: BandColor::GREEN },
        ]))
        .unwrap();

        let frame = wait_for_frame(&events_rx, |f| f.pixel(0) == [100, 50, 0, 255]);
        assert_eq!(frame.pixel(1), [200, 50, 0, 255]);

        tx.send(CompositorMsg::Close).unwrap();
        handle.join().unwrap();
    }

    #[test]
    fn test_empty_channel_set_yields_black_frame() {
        let (events_tx, events_rx) = mpsc::channel();
        let (tx, handle) = CompositorHandler::spawn(events_tx, GammaTable::identity());

        tx.send(CompositorMsg::Attach { dims: Dims::new(1, 1).unwrap() }).unwrap();

        let frame = wait_for_frame(&events_rx, |f| f.pixel(0) == [0, 0, 0, 255]);
        assert_eq!(frame.dims().pixel_count(), 1);

        tx.send(CompositorMsg::Close).unwrap();
        handle.join().unwrap();
    }

    #[test]
    fn test_mismatched_channel_skipped() {
        let (events_tx, events_rx) = mpsc::channel();
        let (tx, handle) = CompositorHandler::spawn(events_tx, GammaTable::identity());

        let good = SharedBuffer::new(2);
        good.write_from(&[10, 20]);
        let bad = SharedBuffer::new(5);

        tx.send(CompositorMsg::Attach { dims: Dims::new(2, 1).unwrap() }).unwrap();
        tx.send(CompositorMsg::SetChannels(vec![
            CompositeInput { id: ChannelId(0), buffer: bad, color: BandColor::GREEN },
            CompositeInput { id: ChannelId(1), buffer: good, color: BandColor::RED },
        ]))
        .unwrap();

        let frame = wait_for_frame(&events_rx, |f| f.pixel(0) == [10, 0, 0, 255]);
        assert_eq!(frame.pixel(1), [20, 0, 0, 255]);

        tx.send(CompositorMsg::Close).unwrap();
        handle.join().unwrap();
    }
}
