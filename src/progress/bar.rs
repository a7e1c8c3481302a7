//! The display object behind every bunny.
//!
//! [`Bar`] pairs an indicatif [`ProgressBar`] with the terminal it draws on and
//! the counters the iterator keeps. The iterator decides *when* to draw; the
//! bar moves the cursor to its row and lets indicatif render the line.

use std::fmt;
use std::io;
use std::sync::Arc;
use std::time::Instant;

use console::Term;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressFinish, TermLike};

use super::target::SharedTerm;
use crate::animation::ART_ROWS;
use crate::lock::WriteLock;
use crate::progress::BarStyle;
use crate::rate::{self, SharedAvg};
use crate::Result;

/// Counters and timestamps describing progress so far.
#[derive(Debug, Clone, PartialEq)]
pub struct BarState {
    /// Iterations consumed.
    pub n: u64,
    /// Expected number of iterations, if known.
    pub total: Option<u64>,
    /// `n` at the last repaint.
    pub last_print_n: u64,
    /// Time of the last repaint.
    pub last_print_t: Instant,
    /// Smoothed seconds per iteration.
    pub avg_time: Option<f64>,
    /// Iterations to wait before looking at the clock again.
    pub miniters: f64,
    /// When the bar was created.
    pub start: Instant,
}

impl BarState {
    pub fn new(total: Option<u64>, miniters: f64) -> Self {
        let now = Instant::now();
        Self {
            n: 0,
            total,
            last_print_n: 0,
            last_print_t: now,
            avg_time: None,
            miniters,
            start: now,
        }
    }

    /// Iterations per second, preferring the smoothed estimate.
    pub fn rate(&self, now: Instant) -> Option<f64> {
        rate::per_sec(self.avg_time, self.n, now.saturating_duration_since(self.start))
    }

    /// The total, unless it is unknown or zero.
    fn known_total(&self) -> Option<u64> {
        self.total.filter(|&total| total > 0)
    }
}

/// A progress line drawn below the bunny's rows.
pub struct Bar {
    term: SharedTerm,
    pb: ProgressBar,
    leave: bool,
    /// Rows below the cursor's home row where this line lives.
    position: usize,
    avg: SharedAvg,
    pub(crate) state: BarState,
}

impl fmt::Debug for Bar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bar")
            .field("term", &self.term)
            .field("position", &self.position)
            .field("leave", &self.leave)
            .field("state", &self.state)
            .finish()
    }
}

impl Bar {
    /// Create a bar drawing on `term`.
    pub fn new(
        term: Arc<dyn TermLike>,
        style: &BarStyle,
        position: usize,
        state: BarState,
    ) -> Result<Self> {
        let term = SharedTerm::new(term, style.ncols);
        let target = ProgressDrawTarget::term_like(Box::new(term.clone()));
        Self::with_target(term, target, style, position, state)
    }

    /// Create a bar that never draws.
    pub fn hidden(style: &BarStyle, state: BarState) -> Result<Self> {
        let term = SharedTerm::new(Arc::new(Term::stderr()), style.ncols);
        Self::with_target(term, ProgressDrawTarget::hidden(), style, 0, state)
    }

    fn with_target(
        term: SharedTerm,
        target: ProgressDrawTarget,
        style: &BarStyle,
        position: usize,
        state: BarState,
    ) -> Result<Self> {
        let avg = SharedAvg::default();
        let total = state.known_total();
        let pb = ProgressBar::with_draw_target(total, target)
            .with_style(style.to_progress_style(total.is_some(), &avg)?)
            .with_message(style.prefix())
            .with_finish(ProgressFinish::Abandon);

        Ok(Self {
            term,
            pb,
            leave: style.leave,
            position,
            avg,
            state,
        })
    }

    pub fn state(&self) -> &BarState {
        &self.state
    }

    /// The indicatif bar that renders the line.
    pub fn progress_bar(&self) -> &ProgressBar {
        &self.pb
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn is_closed(&self) -> bool {
        self.pb.is_finished()
    }

    /// Width available for drawing.
    pub fn ncols(&self) -> usize {
        self.term.width() as usize
    }

    /// Make room for the bunny above the progress line.
    pub fn reserve(&self) -> io::Result<()> {
        for _ in 0..ART_ROWS {
            self.term.write_line("")?;
        }
        self.term.flush()
    }

    /// Repaint the progress line under `lock`.
    ///
    /// Every call draws: the position is set inside `update`, which skips
    /// indicatif's own position rate limiter. Pacing is the caller's job.
    pub fn refresh(&self, lock: &WriteLock) -> io::Result<()> {
        let n = self.state.n;
        self.avg.set(self.state.avg_time);
        let _guard = lock.acquire();
        self.moveto_line(|| self.pb.update(|progress| progress.set_pos(n)))
    }

    /// Overwrite the art rows above the progress line under `lock`.
    ///
    /// The cursor starts and ends at the start of the progress row.
    pub fn draw_art(&self, lock: &WriteLock, lines: &[String]) -> io::Result<()> {
        let _guard = lock.acquire();
        self.term.move_cursor_up(lines.len())?;
        for line in lines {
            self.term.clear_line()?;
            self.term.write_line(line)?;
        }
        self.term.flush()
    }

    /// Final repaint, then leave or clear the region.
    ///
    /// Returns `false` if the bar was already closed.
    pub fn close(&mut self, lock: &WriteLock) -> io::Result<bool> {
        if self.pb.is_finished() {
            return Ok(false);
        }
        self.avg.set(self.state.avg_time);
        let _guard = lock.acquire();

        if self.leave {
            self.moveto_line(|| {
                self.pb.set_position(self.state.n);
                self.pb.abandon();
            })?;
            if self.position == 0 {
                self.term.write_line("")?;
            }
        } else {
            self.moveto_line(|| self.pb.finish_and_clear())?;
            for _ in 0..ART_ROWS {
                self.term.move_cursor_up(1)?;
                self.term.clear_line()?;
            }
        }
        self.term.flush()?;
        Ok(true)
    }

    fn moveto_line<R>(&self, draw: impl FnOnce() -> R) -> io::Result<R> {
        self.term.move_cursor_down(self.position)?;
        let drawn = draw();
        self.term.move_cursor_up(self.position)?;
        Ok(drawn)
    }
}
