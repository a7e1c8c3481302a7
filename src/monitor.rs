//! Background watchdog for bars that stopped repainting.
//!
//! After a burst of fast iterations the adaptive `miniters` gate can grow
//! large. If the loop then slows down, the bar would wait for many slow
//! iterations before looking at the clock again. The monitor notices when a
//! bar has been silent for longer than `maxinterval` and asks it to reset
//! `miniters` to 1, so the next element triggers a time check.
//!
//! The thread only holds a [`Weak`] reference to the shared [`Pulse`].
//! Dropping the [`Monitor`] wakes the thread and joins it, so a closed bar
//! never leaves a sleeping thread behind.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::debug;

/// State shared between a bar and its monitor thread.
#[derive(Debug)]
pub struct Pulse {
    start: Instant,
    /// Microseconds from `start` to the last repaint.
    last_print_us: AtomicU64,
    reset: AtomicBool,
    stop: AtomicBool,
}

impl Pulse {
    fn new(start: Instant) -> Self {
        Self {
            start,
            last_print_us: AtomicU64::new(0),
            reset: AtomicBool::new(false),
            stop: AtomicBool::new(false),
        }
    }

    /// Record a repaint at `at`.
    pub fn beat(&self, at: Instant) {
        let us = at.saturating_duration_since(self.start).as_micros() as u64;
        self.last_print_us.store(us, Ordering::Relaxed);
    }

    /// Time since the last repaint.
    pub fn idle_for(&self, now: Instant) -> Duration {
        let last = self.start + Duration::from_micros(self.last_print_us.load(Ordering::Relaxed));
        now.saturating_duration_since(last)
    }

    /// Consume a pending reset request.
    pub fn take_reset(&self) -> bool {
        // Plain load first; the swap is only paid when a reset is pending.
        self.reset.load(Ordering::Relaxed) && self.reset.swap(false, Ordering::Relaxed)
    }
}

/// Handle to a running monitor thread. Dropping it stops the thread.
#[derive(Debug)]
pub struct Monitor {
    pulse: Arc<Pulse>,
    handle: Option<JoinHandle<()>>,
}

impl Monitor {
    /// Spawn a thread that wakes every `interval` and flags the bar when it
    /// has been idle for at least `maxinterval`.
    pub fn spawn(start: Instant, interval: Duration, maxinterval: Duration) -> Self {
        let pulse = Arc::new(Pulse::new(start));
        let weak = Arc::downgrade(&pulse);
        let handle = thread::Builder::new()
            .name("bunny-monitor".into())
            .spawn(move || Self::watch(weak, interval, maxinterval))
            .map_err(|e| debug!("Monitor thread not started: {}", e))
            .ok();
        Self { pulse, handle }
    }

    pub fn pulse(&self) -> &Pulse {
        &self.pulse
    }

    fn watch(pulse: Weak<Pulse>, interval: Duration, maxinterval: Duration) {
        loop {
            thread::park_timeout(interval);
            let Some(pulse) = pulse.upgrade() else {
                break;
            };
            if pulse.stop.load(Ordering::Acquire) {
                break;
            }
            let idle = pulse.idle_for(Instant::now());
            if idle >= maxinterval {
                debug!("Bar idle for {:?}, resetting miniters", idle);
                pulse.reset.store(true, Ordering::Relaxed);
            }
        }
    }
}

impl Drop for Monitor {
    fn drop(&mut self) {
        self.pulse.stop.store(true, Ordering::Release);
        if let Some(handle) = self.handle.take() {
            handle.thread().unpark();
            if handle.join().is_err() {
                debug!("Monitor thread panicked");
            }
        }
    }
}
