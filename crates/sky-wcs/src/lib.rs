//! # sky-wcs
//!
//! Bidirectional mapping between pixel coordinates and equatorial sky
//! coordinates under a linear (CD-matrix) WCS model.
//!
//! The model is the standard FITS linear approximation: a reference sky
//! position (`crval1`, `crval2` in degrees), a reference pixel (`crpix1`,
//! `crpix2`), and a 2x2 transform (`cd11..cd22` in degrees per pixel).
//! Right ascension offsets are scaled by `1 / cos(dec)` so the transform
//! stays locally conformal away from the celestial poles.
//!
//! Both directions normalize `crval2` into `[0, 360)` before taking its
//! cosine, and the inverse is the exact algebraic inverse of the forward
//! direction, so `pixel_to_sky` followed by `sky_to_pixel` round-trips to
//! floating-point tolerance on any non-degenerate transform.
//!
//! # Usage
//!
//! ```rust
//! use sky_wcs::{Wcs, WcsParams};
//!
//! let wcs = Wcs::new(WcsParams {
//!     crval1: 150.0,
//!     crval2: 2.2,
//!     crpix1: 512.0,
//!     crpix2: 512.0,
//!     cd11: -0.0001,
//!     cd12: 0.0,
//!     cd21: 0.0,
//!     cd22: 0.0001,
//! });
//!
//! let (ra, dec) = wcs.pixel_to_sky(100.0, 200.0).unwrap();
//! let (x, y) = wcs.sky_to_pixel(ra, dec).unwrap();
//! assert!((x - 100.0).abs() < 1e-6);
//! assert!((y - 200.0).abs() < 1e-6);
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Threshold below which a cosine or determinant is treated as zero.
const TINY: f64 = 1e-10;

const DEG_TO_RAD: f64 = std::f64::consts::PI / 180.0;

/// Result type for WCS operations.
pub type WcsResult<T> = Result<T, WcsError>;

/// Degenerate WCS parameter conditions.
///
/// Both variants mean the supplied parameters themselves are wrong; there
/// is nothing to retry.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum WcsError {
    /// `|cos(crval2)|` is below threshold: the RA scale is undefined this
    /// close to the celestial pole.
    #[error("cos(crval2) = {cos} too close to zero: RA scale undefined near the pole")]
    NearPole {
        /// The offending cosine value
        cos: f64,
    },

    /// The CD matrix determinant is below threshold: the transform cannot
    /// be inverted.
    #[error("CD matrix is singular (determinant = {det})")]
    SingularMatrix {
        /// The offending determinant
        det: f64,
    },
}

/// Linear WCS parameters, as supplied by external image metadata.
///
/// Immutable per image.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WcsParams {
    /// Reference right ascension, degrees
    pub crval1: f64,
    /// Reference declination, degrees
    pub crval2: f64,
    /// Reference pixel X
    pub crpix1: f64,
    /// Reference pixel Y
    pub crpix2: f64,
    /// CD matrix element (1,1), degrees/pixel
    pub cd11: f64,
    /// CD matrix element (1,2), degrees/pixel
    pub cd12: f64,
    /// CD matrix element (2,1), degrees/pixel
    pub cd21: f64,
    /// CD matrix element (2,2), degrees/pixel
    pub cd22: f64,
}

/// A linear WCS transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Wcs {
    params: WcsParams,
}

/// Converts degrees to radians.
#[inline]
pub fn degrees_to_radians(deg: f64) -> f64 {
    deg * DEG_TO_RAD
}

/// Normalizes an angle in degrees into `[0, 360)`.
#[inline]
pub fn normalize_degrees(deg: f64) -> f64 {
    ((deg % 360.0) + 360.0) % 360.0
}

impl Wcs {
    /// Creates a transform from linear WCS parameters.
    pub fn new(params: WcsParams) -> Self {
        Self { params }
    }

    /// The underlying parameters.
    #[inline]
    pub fn params(&self) -> &WcsParams {
        &self.params
    }

    /// Cosine of the reference declination, or the near-pole error.
    fn cos_crval2(&self) -> WcsResult<f64> {
        let cos = degrees_to_radians(normalize_degrees(self.params.crval2)).cos();
        if cos.abs() < TINY {
            return Err(WcsError::NearPole { cos });
        }
        Ok(cos)
    }

    /// Maps a pixel position to `(ra, dec)` in degrees.
    ///
    /// Fails with [`WcsError::NearPole`] when the reference declination is
    /// too close to +-90 degrees for the RA scale to be meaningful.
    pub fn pixel_to_sky(&self, x: f64, y: f64) -> WcsResult<(f64, f64)> {
        let p = &self.params;
        let cos = self.cos_crval2()?;
        let dx = x - p.crpix1;
        let dy = y - p.crpix2;
        let ra = p.crval1 + (dx * p.cd11 + dy * p.cd12) / cos;
        let dec = p.crval2 + dx * p.cd21 + dy * p.cd22;
        Ok((ra, dec))
    }

    /// Maps `(ra, dec)` in degrees to a pixel position.
    ///
    /// Fails with [`WcsError::SingularMatrix`] when the CD matrix cannot
    /// be inverted, or [`WcsError::NearPole`] near the celestial pole.
    pub fn sky_to_pixel(&self, ra: f64, dec: f64) -> WcsResult<(f64, f64)> {
        let p = &self.params;
        let det = p.cd11 * p.cd22 - p.cd21 * p.cd12;
        if det.abs() < TINY {
            return Err(WcsError::SingularMatrix { det });
        }
        let cos = self.cos_crval2()?;

        // Invert ra' = (dx*cd11 + dy*cd12)/cos, dec' = dx*cd21 + dy*cd22
        let u = (ra - p.crval1) * cos;
        let v = dec - p.crval2;
        let x = p.crpix1 + (p.cd22 * u - p.cd12 * v) / det;
        let y = p.crpix2 + (p.cd11 * v - p.cd21 * u) / det;
        Ok((x, y))
    }
}
