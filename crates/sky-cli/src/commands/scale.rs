//! Single-band scaling command

use std::time::{Duration, Instant};

use anyhow::{Result, bail};
use sky_render::{BandPreview, RenderConfig, RenderEvent};
use tracing::info;

use crate::ScaleArgs;

const DEADLINE: Duration = Duration::from_secs(30);

pub fn run(args: ScaleArgs) -> Result<()> {
    let dims = super::checked_dims(args.width, args.height)?;
    let raw = match &args.input {
        Some(path) => super::load_band(path, dims)?,
        None => {
            info!("no input band, synthesizing a gradient");
            super::synth_gradient(dims)
        }
    };
    let window = super::resolve_window(&raw, args.low, args.high)?;
    info!(?dims, low = window.low, high = window.high, gamma = args.gamma, "scaling band");

    let mut preview = BandPreview::new(dims, RenderConfig { gamma: args.gamma });
    preview.set_raw(raw);
    let generation = preview.set_window(window);

    let start = Instant::now();
    while start.elapsed() < DEADLINE {
        match preview.poll(Duration::from_millis(100)) {
            Some(RenderEvent::Preview { png, generation: g, .. }) if g == generation => {
                super::write_blob(&args.output, &png)?;
                println!("Wrote {}", args.output.display());
                return Ok(());
            }
            Some(RenderEvent::ScalerError { message, .. }) => {
                bail!("scale pass failed: {message}");
            }
            _ => {}
        }
    }
    bail!("scaler produced no output before the deadline");
}
