//! # sky-ops
//!
//! Raster operations for astronomical image rendering.
//!
//! This crate holds the pure per-pixel algorithms the worker engine runs:
//! intensity windowing of single bands and additive multi-band
//! compositing, plus the light-curve helpers for externally computed
//! periodograms.
//!
//! # Modules
//!
//! - [`scale`] - clip/normalize/gamma scaling of one raw band
//! - [`composite`] - color-weighted additive compositing of N bands
//! - [`parallel`] - rayon variants of both (feature `parallel`, default on)
//! - [`periodogram`] - peak selection and phase folding
//!
//! # Example
//!
//! ```rust
//! use sky_core::{BandColor, Dims};
//! use sky_lut::GammaTable;
//! use sky_ops::composite::{composite, ChannelView};
//! use sky_ops::scale::{scale_band, ScaleWindow};
//!
//! let gamma = GammaTable::shared();
//! let window = ScaleWindow::new(200.0, 1800.0).unwrap();
//! let scaled = scale_band(&[150.0, 1000.0, 2000.0], window, gamma).unwrap();
//!
//! let dims = Dims::new(3, 1).unwrap();
//! let frame = composite(&[ChannelView::new(&scaled, BandColor::RED)], gamma, dims).unwrap();
//! assert_eq!(frame.pixel(0)[3], 255);
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod composite;
mod error;
pub mod periodogram;
pub mod scale;

#[cfg(feature = "parallel")]
pub mod parallel;

pub use error::{OpsError, OpsResult};
pub use scale::ScaleWindow;
