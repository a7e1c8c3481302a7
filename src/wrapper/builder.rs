//! Builder pattern implementation for creating [`Bunny`] instances.
//!
//! # Examples
//!
//! ## Basic Builder Usage
//!
//! ```rust
//! use std::time::Duration;
//! use bunny::wrapper::BunnyBuilder;
//!
//! let epochs = BunnyBuilder::new()
//!     .desc("training")
//!     .mininterval(Duration::from_millis(50))
//!     .build(0..10)
//!     .unwrap();
//! assert_eq!(epochs.sum::<i32>(), 45);
//! ```
//!
//! ## Sharing a Write-Lock Between Bars
//!
//! ```rust
//! use std::sync::Arc;
//! use bunny::lock::WriteLock;
//! use bunny::wrapper::BunnyBuilder;
//!
//! let lock = Arc::new(WriteLock::detect());
//! let outer = BunnyBuilder::hidden().write_lock(lock.clone()).build(0..3).unwrap();
//! let inner = BunnyBuilder::hidden().write_lock(lock).position(1).build(0..3).unwrap();
//! # drop((outer, inner));
//! ```

use std::sync::Arc;
use std::time::Duration;

use console::{Color, Term};
use indicatif::TermLike;
use tracing::warn;

use super::{config::BunnyConfig, iter::Bunny};
use crate::lock::WriteLock;
use crate::progress::BarStyle;
use crate::{Error, Result};

/// A builder used to create a [`Bunny`].
///
/// ```rust
/// # fn main()  {
/// use bunny::wrapper::BunnyBuilder;
///
/// let b = BunnyBuilder::new().total(5).smoothing(0.1).hidden_if(true).build(0..5).unwrap();
/// # }
/// ```
#[derive(Debug, Default)]
pub struct BunnyBuilder {
    config: BunnyConfig,
    term: Option<Arc<dyn TermLike>>,
}

impl BunnyBuilder {
    /// Creates a builder with the default options.
    pub fn new() -> Self {
        BunnyBuilder::default()
    }

    /// Convenience function to disable all drawing.
    pub fn hidden() -> Self {
        BunnyBuilder::default().disable(true)
    }

    /// Disable drawing when `hidden` is true, e.g. when stderr is not a tty.
    pub fn hidden_if(self, hidden: bool) -> Self {
        self.disable(hidden)
    }

    /// Replace the whole configuration.
    pub fn config(mut self, config: BunnyConfig) -> Self {
        self.config = config;
        self
    }

    /// Minimum time between repaints of the progress line.
    pub fn mininterval(mut self, mininterval: Duration) -> Self {
        self.config.mininterval = mininterval;
        self
    }

    /// Maximum time between repaints. Zero disables the limit.
    pub fn maxinterval(mut self, maxinterval: Duration) -> Self {
        self.config.maxinterval = maxinterval;
        self
    }

    /// Pin the number of iterations between clock checks.
    ///
    /// Pinned values are never adjusted.
    pub fn miniters(mut self, miniters: u64) -> Self {
        self.config.miniters = Some(miniters);
        self
    }

    /// EMA weight for rate smoothing. Values are clamped to `0.0..=1.0`.
    pub fn smoothing(mut self, smoothing: f64) -> Self {
        self.config.smoothing = smoothing.clamp(0.0, 1.0);
        self
    }

    /// Expected number of iterations.
    pub fn total(mut self, total: u64) -> Self {
        self.config.total = Some(total);
        self
    }

    pub fn disable(mut self, disable: bool) -> Self {
        self.config.disable = disable;
        self
    }

    /// Row offset of the progress line.
    pub fn position(mut self, position: usize) -> Self {
        self.config.position = position;
        self
    }

    /// Set the whole progress line style.
    pub fn style(mut self, style: BarStyle) -> Self {
        self.config.style = style;
        self
    }

    pub fn desc<S: Into<String>>(mut self, desc: S) -> Self {
        self.config.style.set_desc(desc);
        self
    }

    pub fn unit<S: Into<String>>(mut self, unit: S) -> Self {
        self.config.style.set_unit(unit);
        self
    }

    /// Fixed drawing width instead of the terminal width.
    pub fn ncols(mut self, ncols: u16) -> Self {
        self.config.style.set_ncols(ncols);
        self
    }

    pub fn colour(mut self, colour: Color) -> Self {
        self.config.style.set_colour(colour);
        self
    }

    pub fn progress_chars(mut self, chars: &str) -> Self {
        self.config.style.set_progress_chars(chars);
        self
    }

    /// Keep the final line and bunny on screen once closed.
    pub fn leave(mut self, leave: bool) -> Self {
        self.config.style.set_leave(leave);
        self
    }

    /// Wake-up period of the monitor thread. Zero disables it.
    pub fn monitor_interval(mut self, interval: Duration) -> Self {
        self.config.monitor_interval = interval;
        self
    }

    /// Request the legacy GUI mode. Building will fail.
    pub fn gui(mut self, gui: bool) -> Self {
        self.config.gui = gui;
        self
    }

    /// Use `lock` instead of the process-wide [`WriteLock::shared`].
    pub fn write_lock(mut self, lock: Arc<WriteLock>) -> Self {
        self.config.write_lock = Some(lock);
        self
    }

    /// Draw on `term` instead of stderr.
    pub fn term<T: TermLike + 'static>(mut self, term: T) -> Self {
        self.term = Some(Arc::new(term));
        self
    }

    /// Get a reference to the configuration built so far.
    pub fn get_config(&self) -> &BunnyConfig {
        &self.config
    }

    /// Create the [`Bunny`] around `iterable` with the specified options.
    ///
    /// When no total was given, it is taken from an exact size hint.
    pub fn build<I: IntoIterator>(self, iterable: I) -> Result<Bunny<I::IntoIter>> {
        if self.config.gui {
            warn!("GUI mode requested; it is no longer supported");
            return Err(Error::GuiDeprecated);
        }
        self.build_unchecked(iterable.into_iter())
    }

    pub(crate) fn build_unchecked<I: Iterator>(mut self, iter: I) -> Result<Bunny<I>> {
        if self.config.total.is_none() {
            if let (lower, Some(upper)) = iter.size_hint() {
                if lower == upper {
                    self.config.total = Some(lower as u64);
                }
            }
        }
        let term = self.term.unwrap_or_else(|| Arc::new(Term::stderr()));
        Bunny::new(iter, self.config, term)
    }
}
