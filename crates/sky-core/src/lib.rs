//! # sky-core
//!
//! Core types for the astronomical image rendering pipeline.
//!
//! This crate provides the data model shared by every rendering stage:
//!
//! - [`Dims`] / [`FrameBuffer`] - raster dimensions and the RGBA
//!   presentation buffer (alpha fixed at 255)
//! - [`SharedBuffer`] - the lock-free per-band byte buffer shared between
//!   a scaler worker and the compositor
//! - [`BandColor`] - per-band contribution weights, plus the astronomical
//!   filter-name mapping
//! - [`Error`] - unified error type for scale windows, size mismatches,
//!   and dimension validation
//!
//! # Usage
//!
//! ```rust
//! use sky_core::{BandColor, Dims, FrameBuffer, SharedBuffer};
//!
//! let dims = Dims::new(64, 64).unwrap();
//! let frame = FrameBuffer::new(dims);
//! assert_eq!(frame.pixel(0)[3], 255);
//!
//! let shared = SharedBuffer::new(dims.pixel_count());
//! shared.store(0, 128);
//!
//! let red = BandColor::from_rgb8(255, 0, 0);
//! assert_eq!(red.weight(0), 1.0);
//! ```
//!
//! # Used By
//!
//! - `sky-ops` - scaling and compositing algorithms
//! - `sky-render` - worker engine

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod color;
mod error;
mod raster;
mod shared;

pub use color::{BandColor, filter_color};
pub use error::{Error, Result};
pub use raster::{Dims, FrameBuffer};
pub use shared::SharedBuffer;
