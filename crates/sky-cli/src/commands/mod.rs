//! CLI command implementations

pub mod composite;
pub mod period;
pub mod scale;
pub mod wcs;

use std::path::Path;

use anyhow::{Context, Result, bail};
use sky_core::Dims;
use sky_ops::ScaleWindow;
use tracing::warn;

/// Largest accepted output dimension; survey cutouts beyond this are
/// rejected rather than rendered at full size.
pub const MAX_DIMENSION: u32 = 1024;

/// Validates output dimensions against [`MAX_DIMENSION`].
pub fn checked_dims(width: u32, height: u32) -> Result<Dims> {
    if width > MAX_DIMENSION || height > MAX_DIMENSION {
        bail!("dimensions {width}x{height} exceed the {MAX_DIMENSION} pixel limit");
    }
    Ok(Dims::new(width, height)?)
}

/// Loads a raw band of little-endian u16 samples.
pub fn load_band(path: &Path, dims: Dims) -> Result<Vec<f32>> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("failed to read band: {}", path.display()))?;
    let expected = dims.pixel_count() * 2;
    if bytes.len() != expected {
        bail!(
            "{} holds {} bytes, expected {} for {}x{} u16 samples",
            path.display(),
            bytes.len(),
            expected,
            dims.width,
            dims.height
        );
    }
    Ok(bytes
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]) as f32)
        .collect())
}

/// Synthesizes a horizontal intensity ramp over the full u16 range.
pub fn synth_gradient(dims: Dims) -> Vec<f32> {
    let width = dims.width as usize;
    let span = (width - 1).max(1) as f32;
    (0..dims.pixel_count())
        .map(|j| (j % width) as f32 / span * 65535.0)
        .collect()
}

/// Picks a clip window: explicit bounds where given, the band's own
/// min/max otherwise.
pub fn resolve_window(raw: &[f32], low: Option<f32>, high: Option<f32>) -> Result<ScaleWindow> {
    let (min, max) = raw.iter().fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &s| {
        (lo.min(s), hi.max(s))
    });
    let low = low.unwrap_or(min);
    let mut high = high.unwrap_or(max);
    if high <= low {
        warn!(low, high, "degenerate window, widening upper bound");
        high = low + 1.0;
    }
    Ok(ScaleWindow::new(low, high)?)
}

/// Parses a "a,b" coordinate pair.
pub fn parse_pair(text: &str) -> Result<(f64, f64)> {
    let (a, b) = text
        .split_once(',')
        .with_context(|| format!("expected \"a,b\", got {text:?}"))?;
    Ok((a.trim().parse()?, b.trim().parse()?))
}

/// Writes an encoded blob to disk.
pub fn write_blob(path: &Path, blob: &[u8]) -> Result<()> {
    std::fs::write(path, blob)
        .with_context(|| format!("failed to write: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checked_dims_limit() {
        assert!(checked_dims(1024, 1024).is_ok());
        assert!(checked_dims(1025, 16).is_err());
        assert!(checked_dims(0, 16).is_err());
    }

    #[test]
    fn test_gradient_spans_range() {
        let dims = Dims::new(3, 2).unwrap();
        let ramp = synth_gradient(dims);
        assert_eq!(ramp.len(), 6);
        assert_eq!(ramp[0], 0.0);
        assert_eq!(ramp[2], 65535.0);
        assert_eq!(ramp[3], 0.0);
    }

    #[test]
    fn test_resolve_window_from_data() {
        let window = resolve_window(&[5.0, 90.0, 42.0], None, None).unwrap();
        assert_eq!((window.low, window.high), (5.0, 90.0));

        // flat band widens instead of failing
        let window = resolve_window(&[7.0, 7.0], None, None).unwrap();
        assert_eq!((window.low, window.high), (7.0, 8.0));

        let window = resolve_window(&[0.0, 100.0], Some(10.0), Some(20.0)).unwrap();
        assert_eq!((window.low, window.high), (10.0, 20.0));
    }

    #[test]
    fn test_parse_pair() {
        assert_eq!(parse_pair("1.5, -2").unwrap(), (1.5, -2.0));
        assert!(parse_pair("12").is_err());
    }

    #[test]
    fn test_load_band_length_check() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("band.raw");
        std::fs::write(&path, [0u8, 0, 255, 255]).unwrap();

        let dims = Dims::new(2, 1).unwrap();
        let raw = load_band(&path, dims).unwrap();
        assert_eq!(raw, vec![0.0, 65535.0]);

        assert!(load_band(&path, Dims::new(3, 1).unwrap()).is_err());
    }
}
