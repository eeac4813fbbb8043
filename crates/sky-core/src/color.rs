//! Band colors and astronomical filter mapping.
//!
//! A single-band exposure contributes to the composite through a
//! [`BandColor`]: one weight in `[0, 1]` per output channel, normalized
//! from an 8-bit display color. Filters are mapped to display colors the
//! way observatory pipelines conventionally colorize them (r/i/H-alpha as
//! red, v/g/OIII as green, b/SII as blue).

use serde::{Deserialize, Serialize};

/// Per-output-channel contribution weights for one band.
///
/// A weight of 0 means the band contributes nothing to that output channel
/// and compositing short-circuits the multiply-add for it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BandColor {
    /// Red weight in `[0, 1]`
    pub r: f32,
    /// Green weight in `[0, 1]`
    pub g: f32,
    /// Blue weight in `[0, 1]`
    pub b: f32,
}

impl BandColor {
    /// Pure red.
    pub const RED: Self = Self { r: 1.0, g: 0.0, b: 0.0 };
    /// Pure green.
    pub const GREEN: Self = Self { r: 0.0, g: 1.0, b: 0.0 };
    /// Pure blue.
    pub const BLUE: Self = Self { r: 0.0, g: 0.0, b: 1.0 };
    /// Equal-weight white (grayscale contribution).
    pub const WHITE: Self = Self { r: 1.0, g: 1.0, b: 1.0 };

    /// Normalizes an 8-bit color into contribution weights (`v / 255`).
    #[inline]
    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
        }
    }

    /// Weight for output channel `c` (0 = R, 1 = G, 2 = B).
    #[inline]
    pub fn weight(&self, c: usize) -> f32 {
        match c {
            0 => self.r,
            1 => self.g,
            _ => self.b,
        }
    }

    /// Returns `true` if every weight is zero.
    #[inline]
    pub fn is_black(&self) -> bool {
        self.r == 0.0 && self.g == 0.0 && self.b == 0.0
    }
}

/// Maps an astronomical filter name to its conventional display color.
///
/// Returns `None` for filters outside the RGB mapping (narrowband filters
/// a caller may want to colorize explicitly).
///
/// # Example
///
/// ```rust
/// use sky_core::color::{filter_color, BandColor};
///
/// assert_eq!(filter_color("rp"), Some(BandColor::RED));
/// assert_eq!(filter_color("OIII"), Some(BandColor::GREEN));
/// assert_eq!(filter_color("unknown"), None);
/// ```
pub fn filter_color(filter: &str) -> Option<BandColor> {
    let name = filter.trim().to_ascii_lowercase();
    match name.as_str() {
        "r" | "rp" | "ip" | "h-alpha" => Some(BandColor::RED),
        "v" | "gp" | "oiii" => Some(BandColor::GREEN),
        "b" | "sii" => Some(BandColor::BLUE),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rgb8_normalizes() {
        let c = BandColor::from_rgb8(255, 0, 0);
        assert_eq!(c, BandColor::RED);

        let c = BandColor::from_rgb8(51, 102, 255);
        assert!((c.r - 0.2).abs() < 1e-6);
        assert!((c.g - 0.4).abs() < 1e-6);
        assert!((c.b - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_weight_indexing() {
        let c = BandColor { r: 0.1, g: 0.2, b: 0.3 };
        assert_eq!(c.weight(0), 0.1);
        assert_eq!(c.weight(1), 0.2);
        assert_eq!(c.weight(2), 0.3);
    }

    #[test]
    fn test_filter_mapping() {
        assert_eq!(filter_color(" H-Alpha "), Some(BandColor::RED));
        assert_eq!(filter_color("gp"), Some(BandColor::GREEN));
        assert_eq!(filter_color("SII"), Some(BandColor::BLUE));
        assert_eq!(filter_color("w"), None);
    }

    #[test]
    fn test_is_black() {
        assert!(BandColor { r: 0.0, g: 0.0, b: 0.0 }.is_black());
        assert!(!BandColor::RED.is_black());
    }
}
