//! Multi-band compositing command

use std::collections::HashSet;
use std::time::{Duration, Instant};

use anyhow::{Context, Result, bail};
use sky_core::FrameBuffer;
use sky_render::{ChannelId, Engine, RenderConfig, RenderEvent, encode_png};
use tracing::info;

use crate::CompositeArgs;

const DEADLINE: Duration = Duration::from_secs(60);

pub fn run(args: CompositeArgs) -> Result<()> {
    let dims = super::checked_dims(args.width, args.height)?;
    let mut engine = Engine::new(dims, RenderConfig { gamma: args.gamma });

    let mut pending: HashSet<ChannelId> = HashSet::new();
    for band in &args.bands {
        let (path, filter) = band
            .split_once('=')
            .with_context(|| format!("expected file=filter, got {band:?}"))?;
        let Some(id) = engine.register_filter(filter) else {
            bail!("filter {filter:?} has no display color mapping");
        };

        let raw = super::load_band(std::path::Path::new(path), dims)?;
        let window = super::resolve_window(&raw, args.low, args.high)?;
        info!(filter, channel = %id, low = window.low, high = window.high, "band registered");

        engine.set_raw_band(id, dims, raw)?;
        engine.set_scale_window(id, window)?;
        pending.insert(id);
    }

    let frame = wait_for_composite(&mut engine, pending)?;
    super::write_blob(&args.output, &encode_png(&frame)?)?;
    println!("Wrote {}", args.output.display());
    Ok(())
}

/// Drains engine events until every band has been scaled and a composite
/// reflecting them has settled.
fn wait_for_composite(
    engine: &mut Engine,
    mut pending: HashSet<ChannelId>,
) -> Result<FrameBuffer> {
    let start = Instant::now();
    let mut last_frame: Option<FrameBuffer> = None;
    let mut settled = 0u32;

    while start.elapsed() < DEADLINE {
        let events = engine.poll(Duration::from_millis(100));
        if events.is_empty() && pending.is_empty() && last_frame.is_some() {
            // one quiet poll after the last frame means no pass is in flight
            settled += 1;
            if settled >= 2 {
                break;
            }
            continue;
        }
        settled = 0;
        for event in events {
            match event {
                RenderEvent::ChannelUpdated { channel, .. } => {
                    pending.remove(&channel);
                }
                RenderEvent::FrameReady { frame } => {
                    last_frame = Some(frame);
                }
                RenderEvent::ScalerError { channel, message } => {
                    bail!("band {channel} failed to scale: {message}");
                }
                RenderEvent::CompositorError { message } => {
                    bail!("composite failed: {message}");
                }
                RenderEvent::Preview { .. } => {}
            }
        }
    }

    match last_frame {
        Some(frame) if pending.is_empty() => Ok(frame),
        _ => bail!("composite did not settle before the deadline"),
    }
}
