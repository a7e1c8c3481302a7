//! The iterator wrapper, its builder and its configuration.
//!
//! # Overview
//!
//! - `iter` - [`Bunny`], the wrapper itself, and the [`BunnyIterator`] extension trait
//! - `builder` - [`BunnyBuilder`] for configuring a wrapper
//! - `config` - [`BunnyConfig`] and its defaults
//!
//! # Examples
//!
//! ## Basic Usage
//!
//! ```rust
//! use bunny::BunnyIterator;
//!
//! # fn main() -> bunny::Result<()> {
//! let mut seen = 0;
//! for epoch in (0..5).bunny()? {
//!     seen += epoch;
//! }
//! assert_eq!(seen, 10);
//! # Ok(())
//! # }
//! ```
//!
//! ## Hidden Bars
//!
//! ```rust
//! use bunny::wrapper::BunnyBuilder;
//!
//! let quiet = BunnyBuilder::hidden().build(vec!["a", "b"]).unwrap();
//! assert_eq!(quiet.collect::<Vec<_>>(), vec!["a", "b"]);
//! ```

pub mod builder;
pub mod config;
pub mod iter;

pub use builder::BunnyBuilder;
pub use config::BunnyConfig;
pub use iter::{Bunny, BunnyIterator, Lifecycle};
