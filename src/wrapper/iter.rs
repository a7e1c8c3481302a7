//! The animated iteration wrapper.
//!
//! [`Bunny`] yields exactly what the wrapped iterator yields. Between
//! elements it counts, decides whether the progress line is due for a
//! repaint, and redraws the bunny holding the current element.
//!
//! # Examples
//!
//! ```rust
//! use bunny::BunnyIterator;
//! use bunny::wrapper::BunnyBuilder;
//! use indicatif::InMemoryTerm;
//!
//! let term = InMemoryTerm::new(20, 80);
//! let epochs: Vec<u32> = (1..=3)
//!     .bunny_with(BunnyBuilder::new().term(term.clone()))
//!     .unwrap()
//!     .collect();
//! assert_eq!(epochs, vec![1, 2, 3]);
//! assert!(term.contents().contains("TRAINING"));
//! ```

use std::fmt;
use std::io;
use std::iter::FusedIterator;
use std::sync::Arc;
use std::time::Instant;

use indicatif::TermLike;
use tracing::{debug, warn};

use super::builder::BunnyBuilder;
use super::config::BunnyConfig;
use crate::animation;
use crate::lock::WriteLock;
use crate::monitor::Monitor;
use crate::progress::{Bar, BarState};
use crate::rate::{self, Cadence};
use crate::Result;

/// Where a [`Bunny`] is in its life. It only ever moves forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Constructed,
    Iterating,
    Closed,
}

/// Iterator wrapper that draws a progress line and a bunny as it goes.
///
/// Created via [`BunnyBuilder::build`] or the [`BunnyIterator`] extension
/// trait. The bar is closed when the inner iterator runs out, when
/// [`close`](Bunny::close) is called, or when the wrapper is dropped,
/// whichever happens first.
pub struct Bunny<I> {
    iter: I,
    bar: Bar,
    lock: Arc<WriteLock>,
    cadence: Cadence,
    dynamic_miniters: bool,
    disable: bool,
    monitor: Option<Monitor>,
    lifecycle: Lifecycle,
    io_failed: bool,
}

impl<I> fmt::Debug for Bunny<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bunny")
            .field("state", self.bar.state())
            .field("disable", &self.disable)
            .field("lifecycle", &self.lifecycle)
            .finish()
    }
}

impl<I> Bunny<I> {
    pub(crate) fn new(iter: I, config: BunnyConfig, term: Arc<dyn TermLike>) -> Result<Self> {
        let state = BarState::new(config.total, config.initial_miniters());
        let bar = if config.disable {
            Bar::hidden(&config.style, state)?
        } else {
            Bar::new(term, &config.style, config.position, state)?
        };
        let lock = match &config.write_lock {
            Some(lock) => lock.clone(),
            None if config.disable => Arc::new(WriteLock::none()),
            None => WriteLock::shared(),
        };
        let monitor = config.wants_monitor().then(|| {
            Monitor::spawn(bar.state().start, config.monitor_interval, config.maxinterval)
        });

        let mut bunny = Self {
            iter,
            bar,
            lock,
            cadence: config.cadence(),
            dynamic_miniters: config.is_dynamic_miniters(),
            disable: config.disable,
            monitor,
            lifecycle: Lifecycle::Constructed,
            io_failed: false,
        };

        if !bunny.disable {
            debug!("Starting {:?}", config);
            let reserved = bunny.bar.reserve();
            bunny.report("reserve", reserved);
            let painted = bunny.bar.refresh(&bunny.lock);
            bunny.report("repaint", painted);
        }
        Ok(bunny)
    }

    /// Iterations consumed so far.
    pub fn n(&self) -> u64 {
        self.bar.state().n
    }

    /// Expected number of iterations, if known.
    pub fn total(&self) -> Option<u64> {
        self.bar.state().total
    }

    /// Counters, timestamps and the current `miniters`.
    pub fn state(&self) -> &BarState {
        self.bar.state()
    }

    /// The display object drawing the progress line.
    pub fn bar(&self) -> &Bar {
        &self.bar
    }

    /// The lock taken around every terminal write.
    pub fn write_lock(&self) -> &Arc<WriteLock> {
        &self.lock
    }

    /// Return `true` if nothing is drawn.
    pub fn is_disabled(&self) -> bool {
        self.disable
    }

    /// Where the wrapper is in its life.
    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    /// Return `true` once the display has been finalized.
    pub fn is_closed(&self) -> bool {
        self.lifecycle == Lifecycle::Closed
    }

    /// Finalize the display: last repaint, then leave or clear it.
    ///
    /// Only the first call does anything. Later calls, including the one
    /// made on drop, return `Ok(())` without touching the terminal.
    pub fn close(&mut self) -> Result<()> {
        if self.lifecycle == Lifecycle::Closed {
            return Ok(());
        }
        self.lifecycle = Lifecycle::Closed;
        self.monitor = None;
        if self.disable {
            return Ok(());
        }
        self.bar.close(&self.lock)?;
        debug!("Closed after {} iterations", self.bar.state().n);
        Ok(())
    }

    /// Count one element and repaint whatever is due.
    fn advance(&mut self, label: &dyn fmt::Display) {
        self.lifecycle = Lifecycle::Iterating;
        self.bar.state.n += 1;

        if let Some(monitor) = &self.monitor {
            if monitor.pulse().take_reset() {
                self.bar.state.miniters = 1.0;
            }
        }

        // Count first: the clock is only read once enough iterations passed.
        let delta_it = self.bar.state.n - self.bar.state.last_print_n;
        if delta_it as f64 >= self.bar.state.miniters {
            let now = Instant::now();
            let delta_t = now
                .saturating_duration_since(self.bar.state.last_print_t)
                .as_secs_f64();
            if delta_t >= self.cadence.mininterval {
                self.repaint(now, delta_it, delta_t);
            }
        }

        let state = self.bar.state();
        let offset = animation::offset(state.n, state.total, self.bar.ncols());
        let frame = animation::frame(&label.to_string(), offset);
        let drawn = self.bar.draw_art(&self.lock, &frame);
        self.report("animation", drawn);
    }

    fn repaint(&mut self, now: Instant, delta_it: u64, delta_t: f64) {
        let state = &mut self.bar.state;
        state.avg_time = rate::ema(state.avg_time, delta_t, delta_it, self.cadence.smoothing);

        let painted = self.bar.refresh(&self.lock);
        self.report("repaint", painted);

        let state = &mut self.bar.state;
        if self.dynamic_miniters {
            state.miniters = self.cadence.retune(state.miniters, delta_it, delta_t);
        }
        state.last_print_n = state.n;
        state.last_print_t = now;
        if let Some(monitor) = &self.monitor {
            monitor.pulse().beat(now);
        }
    }

    fn report(&mut self, what: &str, result: io::Result<()>) {
        if let Err(e) = result {
            if !self.io_failed {
                warn!("Failed to draw {}: {}", what, e);
                self.io_failed = true;
            } else {
                debug!("Failed to draw {}: {}", what, e);
            }
        }
    }
}

impl<I> Iterator for Bunny<I>
where
    I: Iterator,
    I::Item: fmt::Display,
{
    type Item = I::Item;

    fn next(&mut self) -> Option<Self::Item> {
        if self.lifecycle == Lifecycle::Closed {
            return None;
        }
        if self.disable {
            let item = self.iter.next();
            if item.is_none() {
                self.lifecycle = Lifecycle::Closed;
            }
            return item;
        }

        match self.iter.next() {
            Some(item) => {
                self.advance(&item);
                Some(item)
            }
            None => {
                if let Err(e) = self.close() {
                    debug!("Failed to close: {}", e);
                }
                None
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.lifecycle == Lifecycle::Closed {
            (0, Some(0))
        } else {
            self.iter.size_hint()
        }
    }
}

impl<I> FusedIterator for Bunny<I>
where
    I: Iterator,
    I::Item: fmt::Display,
{
}

impl<I> Drop for Bunny<I> {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            debug!("Failed to close on drop: {}", e);
        }
    }
}

/// Wraps an iterator to display a bunny while it is consumed.
pub trait BunnyIterator: Iterator + Sized {
    /// Wrap with default options. `total` comes from an exact size hint.
    fn bunny(self) -> Result<Bunny<Self>> {
        BunnyBuilder::new().build_unchecked(self)
    }

    /// Wrap with the options of `builder`.
    fn bunny_with(self, builder: BunnyBuilder) -> Result<Bunny<Self>> {
        builder.build(self)
    }
}

impl<T: Iterator> BunnyIterator for T {}
