use std::io;
use std::sync::Arc;

use indicatif::TermLike;

/// A terminal shared between the bunny's art and indicatif's draw target.
///
/// Reports `ncols` as the width when one is set, so `{wide_bar}` and the
/// bunny's drift agree on how wide the region is.
#[derive(Debug, Clone)]
pub(crate) struct SharedTerm {
    inner: Arc<dyn TermLike>,
    ncols: Option<u16>,
}

impl SharedTerm {
    pub(crate) fn new(inner: Arc<dyn TermLike>, ncols: Option<u16>) -> Self {
        Self { inner, ncols }
    }
}

impl TermLike for SharedTerm {
    fn width(&self) -> u16 {
        self.ncols.unwrap_or_else(|| self.inner.width())
    }

    fn height(&self) -> u16 {
        self.inner.height()
    }

    // Zero-line moves are dropped: some terminals read `ESC[0A` as one line.
    fn move_cursor_up(&self, n: usize) -> io::Result<()> {
        match n {
            0 => Ok(()),
            n => self.inner.move_cursor_up(n),
        }
    }

    fn move_cursor_down(&self, n: usize) -> io::Result<()> {
        match n {
            0 => Ok(()),
            n => self.inner.move_cursor_down(n),
        }
    }

    fn move_cursor_right(&self, n: usize) -> io::Result<()> {
        match n {
            0 => Ok(()),
            n => self.inner.move_cursor_right(n),
        }
    }

    fn move_cursor_left(&self, n: usize) -> io::Result<()> {
        match n {
            0 => Ok(()),
            n => self.inner.move_cursor_left(n),
        }
    }

    fn write_line(&self, s: &str) -> io::Result<()> {
        self.inner.write_line(s)
    }

    fn write_str(&self, s: &str) -> io::Result<()> {
        self.inner.write_str(s)
    }

    fn clear_line(&self) -> io::Result<()> {
        self.inner.clear_line()
    }

    fn flush(&self) -> io::Result<()> {
        self.inner.flush()
    }
}
