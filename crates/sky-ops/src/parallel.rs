//! Parallel raster operations using Rayon.
//!
//! Row-parallel versions of scaling and compositing for large frames. The
//! single-threaded functions in [`crate::scale`] and [`crate::composite`]
//! remain the reference implementations; these produce identical output.

use rayon::prelude::*;
use sky_core::FrameBuffer;
use sky_lut::GammaTable;

use crate::composite::{ChannelView, composite_pixel};
use crate::scale::{ScaleWindow, scale_sample};
use crate::{OpsError, OpsResult};

/// Parallel band scaling.
///
/// # Example
///
/// ```rust
/// use sky_lut::GammaTable;
/// use sky_ops::parallel::scale_band;
/// use sky_ops::scale::ScaleWindow;
///
/// let raw = vec![500.0f32; 1024 * 1024];
/// let window = ScaleWindow::new(0.0, 1000.0).unwrap();
/// let out = scale_band(&raw, window, GammaTable::shared()).unwrap();
/// assert_eq!(out.len(), raw.len());
/// ```
pub fn scale_band(raw: &[f32], window: ScaleWindow, gamma: &GammaTable) -> OpsResult<Vec<u8>> {
    window.validate()?;
    Ok(raw
        .par_iter()
        .map(|&s| scale_sample(s, window, gamma))
        .collect())
}

/// Parallel composite into an existing frame.
///
/// Same semantics as [`crate::composite::composite_into`], pixel rows
/// processed in parallel.
pub fn composite_into(
    channels: &[ChannelView<'_>],
    gamma: &GammaTable,
    frame: &mut FrameBuffer,
) -> OpsResult<()> {
    let pixel_count = frame.dims().pixel_count();
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

    if channels.is_empty() {
        frame.clear_rgb();
        return Ok(());
    }

    frame
        .data_mut()
        .par_chunks_exact_mut(4)
        .enumerate()
        .for_each(|(j, px)| {
            let acc = composite_pixel(channels, j);
            px[0] = gamma.apply(acc[0].clamp(0.0, 255.0) as u8);
            px[1] = gamma.apply(acc[1].clamp(0.0, 255.0) as u8);
            px[2] = gamma.apply(acc[2].clamp(0.0, 255.0) as u8);
        });
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sky_core::{BandColor, Dims};

    #[test]
    fn test_parallel_scale_matches_serial() {
        let raw: Vec<f32> = (0..4096).map(|i| i as f32).collect();
        let window = ScaleWindow::new(100.0, 3000.0).unwrap();
        let gamma = GammaTable::build(2.5);
        let serial = crate::scale::scale_band(&raw, window, &gamma).unwrap();
        let parallel = scale_band(&raw, window, &gamma).unwrap();
        assert_eq!(serial, parallel);
    }

    #[test]
    fn test_parallel_composite_matches_serial() {
        let dims = Dims::new(64, 64).unwrap();
        let n = dims.pixel_count();
        let a: Vec<u8> = (0..n).map(|i| (i % 251) as u8).collect();
        let b: Vec<u8> = (0..n).map(|i| (i % 83) as u8).collect();
        let gamma = GammaTable::build(2.5);
        let channels = [
            ChannelView::new(&a, BandColor::RED),
            ChannelView::new(&b, BandColor::from_rgb8(0, 128, 255)),
        ];

        let serial = crate::composite::composite(&channels, &gamma, dims).unwrap();
        let mut parallel = FrameBuffer::new(dims);
        composite_into(&channels, &gamma, &mut parallel).unwrap();
        assert_eq!(serial.data(), parallel.data());
    }

    #[test]
    fn test_parallel_empty_clears() {
        let mut frame = FrameBuffer::new(Dims::new(2, 2).unwrap());
        frame.set_rgb(0, [5, 5, 5]);
        composite_into(&[], &GammaTable::identity(), &mut frame).unwrap();
        assert_eq!(frame.pixel(0), [0, 0, 0, 255]);
    }
}
