//! Bunny is a progress bar with company: while your loop runs, an ASCII-art
//! bunny holds up a sign with the current element and hops to the right as
//! the bar fills.
//!
//! # Quick Start
//!
//! ```rust
//! use bunny::{BunnyBuilder, Error};
//!
//! # fn main() -> Result<(), Error> {
//! let epochs = BunnyBuilder::new().desc("training").build(1..=3)?;
//! for epoch in epochs {
//!     // train for one epoch
//! #   let _ = epoch;
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Module Organization
//!
//! - [`wrapper`] - The [`Bunny`] iterator wrapper, its builder and configuration
//! - [`progress`] - The indicatif progress line and the display object that draws it
//! - [`animation`] - The bunny frames
//! - [`rate`] - Rate smoothing and adaptive redraw cadence
//! - [`lock`] - Process- and thread-safe lock around terminal writes
//! - [`monitor`] - Background watchdog for bars that stopped repainting
//! - [`error`] - Centralized error handling with the `Error` enum

pub mod animation;
pub mod error;
pub mod lock;
pub mod monitor;
pub mod progress;
pub mod rate;
pub mod wrapper;

pub use error::{Error, Result};
pub use lock::WriteLock;
pub use progress::{BarState, BarStyle};
pub use wrapper::{Bunny, BunnyBuilder, BunnyConfig, BunnyIterator};
