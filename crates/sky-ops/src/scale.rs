//! Per-band intensity scaling.
//!
//! Converts one raw sensor band plus a user-selected `[low, high]`
//! intensity window into a displayable 8-bit buffer: clip, normalize to
//! `[0, 255]`, then remap through the gamma table. Issued fresh on every
//! slider change, so the hot loop is deliberately branch-light.

use serde::{Deserialize, Serialize};
use sky_core::FrameBuffer;
use sky_lut::GammaTable;
#[allow(unused_imports)]
use tracing::{debug, trace};

use crate::{OpsError, OpsResult};

/// The user-selected intensity clip range.
///
/// `low < high` is the contract; [`ScaleWindow::validate`] enforces it
/// before any pixel work so a degenerate window never turns into a
/// division by zero inside the loop.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScaleWindow {
    /// Lower clip bound (raw sensor units)
    pub low: f32,
    /// Upper clip bound (raw sensor units)
    pub high: f32,
}

impl ScaleWindow {
    /// Creates a window, rejecting `high <= low` and non-finite bounds.
    pub fn new(low: f32, high: f32) -> OpsResult<Self> {
        let window = Self { low, high };
        window.validate()?;
        Ok(window)
    }

    /// Checks the `low < high` contract.
    pub fn validate(&self) -> OpsResult<()> {
        if !self.low.is_finite() || !self.high.is_finite() || self.high <= self.low {
            return Err(OpsError::InvalidScaleWindow {
                low: self.low,
                high: self.high,
            });
        }
        Ok(())
    }

    /// `255 / (high - low)`, the normalization factor.
    #[inline]
    pub fn scale_factor(&self) -> f32 {
        255.0 / (self.high - self.low)
    }
}

/// Scales a single raw sample into a gamma-corrected 8-bit intensity.
///
/// The normalized value is clamped into `[0, 255]` before the table
/// lookup, so samples outside the window saturate instead of indexing out
/// of range.
#[inline]
pub fn scale_sample(sample: f32, window: ScaleWindow, gamma: &GammaTable) -> u8 {
    let clipped = sample.clamp(window.low, window.high);
    let normalized = ((clipped - window.low) * window.scale_factor()).floor();
    gamma.apply(normalized.clamp(0.0, 255.0) as u8)
}

/// Scales a raw band into a fresh 8-bit buffer.
///
/// # Example
///
/// ```rust
/// use sky_lut::GammaTable;
/// use sky_ops::scale::{scale_band, ScaleWindow};
///
/// let window = ScaleWindow::new(0.0, 255.0).unwrap();
/// let out = scale_band(&[0.0, 128.0, 255.0], window, &GammaTable::identity()).unwrap();
/// assert_eq!(out, vec![0, 128, 255]);
/// ```
pub fn scale_band(raw: &[f32], window: ScaleWindow, gamma: &GammaTable) -> OpsResult<Vec<u8>> {
    window.validate()?;
    trace!(len = raw.len(), ?window, "scale_band");
    Ok(raw.iter().map(|&s| scale_sample(s, window, gamma)).collect())
}

/// Scales a raw band into an existing buffer of matching length.
pub fn scale_band_into(
    raw: &[f32],
    window: ScaleWindow,
    gamma: &GammaTable,
    out: &mut [u8],
) -> OpsResult<()> {
    window.validate()?;
    if out.len() != raw.len() {
        return Err(OpsError::SizeMismatch(format!(
            "expected {} samples, got output buffer of {}",
            raw.len(),
            out.len()
        )));
    }
    for (slot, &s) in out.iter_mut().zip(raw) {
        *slot = scale_sample(s, window, gamma);
    }
    Ok(())
}

/// Expands a scaled grayscale buffer into an RGBA frame (`g, g, g, 255`).
pub fn gray_to_rgba(gray: &[u8], frame: &mut FrameBuffer) -> OpsResult<()> {
    let expected = frame.dims().pixel_count();
    if gray.len() != expected {
        return Err(OpsError::SizeMismatch(format!(
            "expected {} pixels, got {}",
            expected,
            gray.len()
        )));
    }
    for (j, &g) in gray.iter().enumerate() {
        frame.set_rgb(j, [g, g, g]);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sky_core::Dims;

    #[test]
    fn test_full_window_identity_gamma_is_clamp() {
        let window = ScaleWindow::new(0.0, 255.0).unwrap();
        let gamma = GammaTable::identity();
        let raw = [-10.0, 0.0, 1.0, 100.5, 254.0, 255.0, 300.0];
        let out = scale_band(&raw, window, &gamma).unwrap();
        assert_eq!(out, vec![0, 0, 1, 100, 254, 255, 255]);
    }

    #[test]
    fn test_window_endpoints() {
        let window = ScaleWindow::new(1000.0, 2000.0).unwrap();
        let gamma = GammaTable::identity();
        // s <= low maps to 0, s >= high maps to 255
        assert_eq!(scale_sample(500.0, window, &gamma), 0);
        assert_eq!(scale_sample(1000.0, window, &gamma), 0);
        assert_eq!(scale_sample(2000.0, window, &gamma), 255);
        assert_eq!(scale_sample(65535.0, window, &gamma), 255);
        assert_eq!(scale_sample(1500.0, window, &gamma), 127);
    }

    #[test]
    fn test_gamma_applied_after_normalize() {
        let window = ScaleWindow::new(0.0, 510.0).unwrap();
        let gamma = GammaTable::build(2.5);
        assert_eq!(scale_sample(256.0, window, &gamma), gamma.apply(128));
    }

    #[test]
    fn test_degenerate_window_rejected() {
        assert!(ScaleWindow::new(100.0, 100.0).is_err());
        assert!(ScaleWindow::new(200.0, 100.0).is_err());
        assert!(ScaleWindow::new(0.0, f32::INFINITY).is_err());

        let bad = ScaleWindow { low: 5.0, high: 5.0 };
        assert!(scale_band(&[1.0], bad, &GammaTable::identity()).is_err());
    }

    #[test]
    fn test_scale_into_length_check() {
        let window = ScaleWindow::new(0.0, 255.0).unwrap();
        let gamma = GammaTable::identity();
        let mut out = vec![0u8; 2];
        assert!(scale_band_into(&[1.0, 2.0, 3.0], window, &gamma, &mut out).is_err());

        let mut out = vec![0u8; 3];
        scale_band_into(&[1.0, 2.0, 3.0], window, &gamma, &mut out).unwrap();
        assert_eq!(out, vec![1, 2, 3]);
    }

    #[test]
    fn test_gray_to_rgba() {
        let mut frame = FrameBuffer::new(Dims::new(3, 1).unwrap());
        gray_to_rgba(&[0, 128, 255], &mut frame).unwrap();
        assert_eq!(frame.pixel(0), [0, 0, 0, 255]);
        assert_eq!(frame.pixel(1), [128, 128, 128, 255]);
        assert_eq!(frame.pixel(2), [255, 255, 255, 255]);

        assert!(gray_to_rgba(&[0, 1], &mut frame).is_err());
    }
}
