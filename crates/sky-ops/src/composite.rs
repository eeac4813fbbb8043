//! Multi-band additive compositing.
//!
//! Combines N scaled single-band buffers, each weighted by its band color,
//! into one RGB raster, then gamma-corrects the result. The first channel
//! seeds the raster and the rest accumulate:
//!
//! - Seed pass: bands with weight 0 are explicitly zeroed, so the first
//!   channel defines which output bands participate at all.
//! - Accumulation passes: bands with weight 0 are skipped, not zeroed;
//!   later channels only add.
//!
//! Accumulated sums beyond 255 are clamped before the gamma lookup, which
//! doubles as the clipping step.

use sky_core::{BandColor, Dims, FrameBuffer};
use sky_lut::GammaTable;
#[allow(unused_imports)]
use tracing::{debug, trace};

use crate::{OpsError, OpsResult};

/// One channel's inputs to a composite pass: its scaled 8-bit data and the
/// color weighting its contribution.
#[derive(Debug, Clone, Copy)]
pub struct ChannelView<'a> {
    /// Scaled intensity data, one byte per pixel
    pub data: &'a [u8],
    /// Contribution weights per output band
    pub color: BandColor,
}

impl<'a> ChannelView<'a> {
    /// Creates a channel view.
    pub fn new(data: &'a [u8], color: BandColor) -> Self {
        Self { data, color }
    }
}

fn check_sizes(channels: &[ChannelView<'_>], pixel_count: usize) -> OpsResult<()> {
    for (i, ch) in channels.iter().enumerate() {
        if ch.data.len() != pixel_count {
            return Err(OpsError::SizeMismatch(format!(
                "channel {} has {} pixels, composite expects {}",
                i,
                ch.data.len(),
                pixel_count
            )));
        }
    }
    Ok(())
}

/// Composites the three RGB accumulator values for one pixel.
///
/// Seed from `channels[0]`, accumulate `channels[1..]`, pre-clamp.
#[inline]
pub fn composite_pixel(channels: &[ChannelView<'_>], j: usize) -> [f32; 3] {
    let mut acc = [0.0f32; 3];
    if let Some(first) = channels.first() {
        let v = first.data[j] as f32;
        for (c, slot) in acc.iter_mut().enumerate() {
            let w = first.color.weight(c);
            *slot = if w > 0.0 { v * w } else { 0.0 };
        }
    }
    for ch in channels.iter().skip(1) {
        let v = ch.data[j] as f32;
        for (c, slot) in acc.iter_mut().enumerate() {
            let w = ch.color.weight(c);
            if w > 0.0 {
                *slot += v * w;
            }
        }
    }
    acc
}

/// Composites channels into an existing frame of matching dimensions.
///
/// With no channels the frame is cleared to black (alpha stays 255).
/// Fails with [`OpsError::SizeMismatch`] if any channel's length disagrees
/// with the frame's pixel count; the frame is untouched in that case.
pub fn composite_into(
    channels: &[ChannelView<'_>],
    gamma: &GammaTable,
    frame: &mut FrameBuffer,
) -> OpsResult<()> {
    let pixel_count = frame.dims().pixel_count();
    check_sizes(channels, pixel_count)?;
    debug!(channels = channels.len(), pixels = pixel_count, "composite");

    if channels.is_empty() {
        frame.clear_rgb();
        return Ok(());
    }

    for j in 0..pixel_count {
        let acc = composite_pixel(channels, j);
        frame.set_rgb(
            j,
            [
                gamma.apply(acc[0].clamp(0.0, 255.0) as u8),
                gamma.apply(acc[1].clamp(0.0, 255.0) as u8),
                gamma.apply(acc[2].clamp(0.0, 255.0) as u8),
            ],
        );
    }
    Ok(())
}

/// Composites channels into a freshly allocated frame.
///
/// # Example
///
/// ```rust
/// use sky_core::{BandColor, Dims};
/// use sky_lut::GammaTable;
/// use sky_ops::composite::{composite, ChannelView};
///
/// let dims = Dims::new(2, 1).unwrap();
/// let red = ChannelView::new(&[100, 200], BandColor::RED);
/// let frame = composite(&[red], &GammaTable::identity(), dims).unwrap();
/// assert_eq!(frame.pixel(0), [100, 0, 0, 255]);
/// ```
pub fn composite(
    channels: &[ChannelView<'_>],
    gamma: &GammaTable,
    dims: Dims,
) -> OpsResult<FrameBuffer> {
    let mut frame = FrameBuffer::new(dims);
    composite_into(channels, gamma, &mut frame)?;
    Ok(frame)
}
