//! The progress line drawn under the bunny.
//!
//! # Overview
//!
//! - `style` - [`BarStyle`], turned into an indicatif `ProgressStyle`
//! - `bar` - [`Bar`], the display object that owns the indicatif
//!   `ProgressBar` and moves the cursor around the bunny's rows
//! - `target` - the `TermLike` adapter shared by the bar and the art
//!
//! # Examples
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use bunny::progress::{Bar, BarState, BarStyle};
//! use bunny::WriteLock;
//! use indicatif::InMemoryTerm;
//!
//! # fn main() -> bunny::Result<()> {
//! let term = InMemoryTerm::new(10, 60);
//! let bar = Bar::new(Arc::new(term.clone()), &BarStyle::default(), 0, BarState::new(Some(10), 0.0))?;
//! bar.refresh(&WriteLock::none())?;
//! assert!(term.contents().contains("0/10"));
//! # Ok(())
//! # }
//! ```

pub(crate) mod bar;
pub(crate) mod style;
pub(crate) mod target;

pub use bar::{Bar, BarState};
pub use style::BarStyle;
