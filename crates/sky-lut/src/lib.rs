//! # sky-lut
//!
//! Gamma lookup table for 8-bit display rendering.
//!
//! Every rendering path (grayscale scaling and RGB compositing) remaps
//! linear intensity through the same perceptual gamma curve. Since inputs
//! are already 8-bit at that point, the curve is precomputed once into a
//! 256-entry table and applied with a plain index.
//!
//! # Usage
//!
//! ```rust
//! use sky_lut::GammaTable;
//!
//! let table = GammaTable::build(2.5);
//! assert_eq!(table.apply(0), 0);
//! assert!(table.apply(128) > 128); // gamma > 1 brightens midtones
//!
//! // Process-wide cached table for the default gamma
//! let shared = GammaTable::shared();
//! assert_eq!(shared.apply(42), table.apply(42));
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

use std::sync::OnceLock;

/// Number of table entries; one per 8-bit intensity level.
pub const TABLE_SIZE: usize = 256;

/// Default perceptual gamma applied by the rendering pipeline.
pub const DEFAULT_GAMMA: f64 = 2.5;

/// A 256-entry lookup table mapping linear 8-bit intensity to
/// gamma-corrected 8-bit intensity.
///
/// Built once per rendering context and treated as read-only thereafter.
/// The curve is `table[i] = floor(256 * (i/256)^(1/gamma))`, which is
/// monotonically non-decreasing with `table[0] == 0`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GammaTable {
    table: [u8; TABLE_SIZE],
}

impl GammaTable {
    /// Builds the table for the given gamma exponent.
    ///
    /// `gamma = 1.0` yields the identity mapping; `gamma > 1.0` brightens
    /// midtones. Deterministic and pure for any positive, finite gamma.
    pub fn build(gamma: f64) -> Self {
        let size = TABLE_SIZE as f64;
        let inv_gamma = 1.0 / gamma;
        let mut table = [0u8; TABLE_SIZE];
        for (i, slot) in table.iter_mut().enumerate() {
            *slot = (size * (i as f64 / size).powf(inv_gamma)) as u8;
        }
        Self { table }
    }

    /// The identity mapping (`table[i] == i`), useful for pass-through
    /// rendering and tests.
    pub fn identity() -> Self {
        let mut table = [0u8; TABLE_SIZE];
        for (i, slot) in table.iter_mut().enumerate() {
            *slot = i as u8;
        }
        Self { table }
    }

    /// Process-wide table for [`DEFAULT_GAMMA`].
    ///
    /// The parameters never change at runtime, so regenerating the table
    /// per context would be wasted work.
    pub fn shared() -> &'static GammaTable {
        static SHARED: OnceLock<GammaTable> = OnceLock::new();
        SHARED.get_or_init(|| GammaTable::build(DEFAULT_GAMMA))
    }

    /// Looks up the gamma-corrected value for a linear intensity.
    #[inline]
    pub fn apply(&self, value: u8) -> u8 {
        self.table[value as usize]
    }

    /// The raw table entries.
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.table
    }
}

impl Default for GammaTable {
    fn default() -> Self {
        Self::build(DEFAULT_GAMMA)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_maps_to_zero() {
        assert_eq!(GammaTable::build(2.5).apply(0), 0);
        assert_eq!(GammaTable::identity().apply(0), 0);
    }

    #[test]
    fn test_length() {
        assert_eq!(GammaTable::build(2.5).as_slice().len(), 256);
    }

    #[test]
    fn test_non_decreasing() {
        let table = GammaTable::build(2.5);
        for i in 1..TABLE_SIZE {
            assert!(
                table.apply(i as u8) >= table.apply((i - 1) as u8),
                "table decreases at {i}"
            );
        }
    }

    #[test]
    fn test_gamma_one_is_identity() {
        let table = GammaTable::build(1.0);
        for i in 0..TABLE_SIZE {
            assert_eq!(table.apply(i as u8), i as u8);
        }
    }

    #[test]
    fn test_identity_table() {
        let table = GammaTable::identity();
        assert_eq!(table.apply(37), 37);
        assert_eq!(table.apply(255), 255);
    }

    #[test]
    fn test_shared_matches_default() {
        assert_eq!(GammaTable::shared().as_slice(), GammaTable::default().as_slice());
    }

    #[test]
    fn test_brightens_midtones() {
        // gamma 2.5 lifts the middle of the curve
        let table = GammaTable::build(2.5);
        assert!(table.apply(64) > 64);
        assert!(table.apply(128) > 128);
    }
}
