//! # sky-render
//!
//! The offscreen worker engine for astronomical image rendering.
//!
//! An [`Engine`] owns one scaler worker thread per registered channel and
//! a single compositor worker. Scalers turn raw floating-point bands into
//! displayable 8-bit intensities under a user-selected clip window, write
//! them into lock-free shared buffers, and the compositor folds all
//! channels into one color frame whenever any of them changes.
//!
//! Two properties shape the design:
//!
//! - **Latest wins.** Window changes arrive faster than passes complete
//!   while a slider is dragged. Each scaler keeps at most one pending
//!   request and drains its queue before working, so stale requests are
//!   dropped rather than rendered.
//! - **Errors are events.** A worker never panics across its thread
//!   boundary; invalid windows and size mismatches come back as
//!   [`RenderEvent`] errors and the previous output stays on screen.
//!
//! [`BandPreview`] runs a single scaler without a compositor, delivering
//! each pass as an encoded PNG instead of a shared-buffer update.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod compositor;
mod config;
mod engine;
mod error;
mod mailbox;
pub mod messages;
mod scaler;
mod store;
mod surface;

pub use config::RenderConfig;
pub use engine::{BandPreview, Engine};
pub use error::{RenderError, RenderResult};
pub use messages::{Generation, RenderEvent};
pub use store::{ChannelId, ChannelStore};
pub use surface::encode_png;
