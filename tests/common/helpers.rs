#![allow(dead_code)]

use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use bunny::lock::{Held, LockPrimitive, WriteLock};
use bunny::progress::{Bar, BarState, BarStyle};
use bunny::wrapper::BunnyBuilder;
use indicatif::{InMemoryTerm, TermLike};

// Common test constants
pub const TEST_ROWS: u16 = 40;
pub const TEST_NCOLS: u16 = 80;
pub const TEST_DESC: &str = "epochs";

/// Shared log of lock events, in the order they happened.
pub type EventLog = Arc<Mutex<Vec<String>>>;

// === Lock Helpers ===

/// A lock primitive that only records when it is taken and released.
#[derive(Debug)]
pub struct RecordingLock {
    name: &'static str,
    log: EventLog,
}

struct RecordingRelease {
    name: &'static str,
    log: EventLog,
}

impl Drop for RecordingRelease {
    fn drop(&mut self) {
        self.log
            .lock()
            .unwrap()
            .push(format!("release {}", self.name));
    }
}

impl LockPrimitive for RecordingLock {
    fn kind(&self) -> &'static str {
        self.name
    }

    fn lock(&self) -> Box<dyn Held + '_> {
        self.log.lock().unwrap().push(format!("acquire {}", self.name));
        Box::new(RecordingRelease {
            name: self.name,
            log: self.log.clone(),
        })
    }
}

/// Creates a write lock out of recording primitives with the given names.
pub fn create_recording_write_lock(names: &[&'static str]) -> (WriteLock, EventLog) {
    let log: EventLog = Arc::new(Mutex::new(Vec::new()));
    let primitives = names
        .iter()
        .map(|&name| {
            Box::new(RecordingLock {
                name,
                log: log.clone(),
            }) as Box<dyn LockPrimitive>
        })
        .collect();
    (WriteLock::new(primitives), log)
}

/// Snapshot of the recorded lock events.
pub fn events(log: &EventLog) -> Vec<String> {
    log.lock().unwrap().clone()
}

/// Number of times the primitive called `name` was acquired.
pub fn count_acquisitions(log: &EventLog, name: &str) -> usize {
    let needle = format!("acquire {}", name);
    events(log).iter().filter(|e| **e == needle).count()
}

// === Terminal Helpers ===

/// One call made on a [`RecordingTerm`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TermOp {
    Up(usize),
    Down(usize),
    Right(usize),
    Left(usize),
    WriteLine(String),
    WriteStr(String),
    ClearLine,
    Flush,
}

/// An in-memory screen that also keeps the calls made on it.
///
/// Clones share the screen and the log.
#[derive(Debug, Clone)]
pub struct RecordingTerm {
    screen: InMemoryTerm,
    ops: Arc<Mutex<Vec<TermOp>>>,
}

impl RecordingTerm {
    pub fn new(rows: u16, cols: u16) -> Self {
        Self {
            screen: InMemoryTerm::new(rows, cols),
            ops: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Every call so far, in order.
    pub fn ops(&self) -> Vec<TermOp> {
        self.ops.lock().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.ops.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// What the screen shows, trailing blank rows removed.
    pub fn contents(&self) -> String {
        self.screen.contents()
    }

    fn record(&self, op: TermOp) {
        self.ops.lock().unwrap().push(op);
    }
}

impl TermLike for RecordingTerm {
    fn width(&self) -> u16 {
        self.screen.width()
    }

    fn height(&self) -> u16 {
        self.screen.height()
    }

    fn move_cursor_up(&self, n: usize) -> io::Result<()> {
        self.record(TermOp::Up(n));
        self.screen.move_cursor_up(n)
    }

    fn move_cursor_down(&self, n: usize) -> io::Result<()> {
        self.record(TermOp::Down(n));
        self.screen.move_cursor_down(n)
    }

    fn move_cursor_right(&self, n: usize) -> io::Result<()> {
        self.record(TermOp::Right(n));
        self.screen.move_cursor_right(n)
    }

    fn move_cursor_left(&self, n: usize) -> io::Result<()> {
        self.record(TermOp::Left(n));
        self.screen.move_cursor_left(n)
    }

    fn write_line(&self, s: &str) -> io::Result<()> {
        self.record(TermOp::WriteLine(s.into()));
        self.screen.write_line(s)
    }

    fn write_str(&self, s: &str) -> io::Result<()> {
        self.record(TermOp::WriteStr(s.into()));
        self.screen.write_str(s)
    }

    fn clear_line(&self) -> io::Result<()> {
        self.record(TermOp::ClearLine);
        self.screen.clear_line()
    }

    fn flush(&self) -> io::Result<()> {
        self.record(TermOp::Flush);
        self.screen.flush()
    }
}

/// Creates a recording terminal with the test size.
pub fn create_test_term() -> RecordingTerm {
    RecordingTerm::new(TEST_ROWS, TEST_NCOLS)
}

/// The progress line currently on screen, if any.
pub fn bar_line(term: &RecordingTerm) -> Option<String> {
    term.contents()
        .lines()
        .rev()
        .find(|line| line.ends_with("/s]"))
        .map(str::to_string)
}

/// Every art row written on `term` containing `needle`.
pub fn art_lines_with(term: &RecordingTerm, needle: &str) -> Vec<String> {
    term.ops()
        .into_iter()
        .filter_map(|op| match op {
            TermOp::WriteLine(s) if s.contains(needle) => Some(s),
            _ => None,
        })
        .collect()
}

/// Progress line repaints behind `log`, given how many elements were drawn.
///
/// Each element takes the lock once for its art; every other acquisition is
/// a repaint.
pub fn count_repaints(log: &EventLog, name: &str, elements: usize) -> usize {
    count_acquisitions(log, name) - elements
}

// === Builder Helpers ===

/// Creates a builder drawing on `term` with the monitor turned off.
pub fn create_test_builder(term: &RecordingTerm) -> BunnyBuilder {
    BunnyBuilder::new()
        .term(term.clone())
        .ncols(TEST_NCOLS)
        .monitor_interval(Duration::ZERO)
}

/// Creates a builder that repaints the progress line on every element.
pub fn create_eager_builder(term: &RecordingTerm) -> BunnyBuilder {
    create_test_builder(term)
        .mininterval(Duration::ZERO)
        .miniters(1)
}

/// Creates a test builder whose write lock records every acquisition.
pub fn create_counting_builder(term: &RecordingTerm) -> (BunnyBuilder, EventLog) {
    let (lock, log) = create_recording_write_lock(&["thread"]);
    (create_test_builder(term).write_lock(Arc::new(lock)), log)
}

// === Bar Helpers ===

/// Creates a display object at `n` out of `total` drawing on `term`.
pub fn create_test_bar(term: &RecordingTerm, n: u64, total: Option<u64>) -> Bar {
    let mut style = BarStyle::default();
    style.set_ncols(60);
    let mut state = BarState::new(total, 0.0);
    state.n = n;
    create_styled_bar(term, style, state)
}

/// Creates a display object with a custom style.
pub fn create_styled_bar(term: &RecordingTerm, style: BarStyle, state: BarState) -> Bar {
    Bar::new(Arc::new(term.clone()), &style, 0, state).unwrap()
}

/// Repaints `bar` and returns the progress line it left on screen.
pub fn render(term: &RecordingTerm, bar: &Bar) -> String {
    bar.refresh(&WriteLock::none()).unwrap();
    bar_line(term).unwrap_or_default()
}
