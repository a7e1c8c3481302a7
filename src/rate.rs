//! Rate smoothing and redraw cadence.
//!
//! [`ema`] and [`Cadence::retune`] are pure so the iterator can call them on
//! its hot path and tests can pin their arithmetic down exactly.
//! [`SharedAvg`] hands the smoothed value over to the progress bar's template
//! keys, which are formatted wherever indicatif draws.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Exponential moving average of the time per iteration, in seconds.
///
/// Returns `prev` untouched when smoothing is off or either delta is zero.
pub fn ema(prev: Option<f64>, delta_t: f64, delta_it: u64, smoothing: f64) -> Option<f64> {
    if smoothing == 0.0 || delta_t == 0.0 || delta_it == 0 {
        return prev;
    }
    let sample = delta_t / delta_it as f64;
    Some(match prev {
        None => sample,
        Some(avg) => smoothing * sample + (1.0 - smoothing) * avg,
    })
}

/// Iterations per second, preferring the smoothed estimate over the overall
/// average.
pub fn per_sec(avg_time: Option<f64>, n: u64, elapsed: Duration) -> Option<f64> {
    match avg_time {
        Some(avg) if avg > 0.0 => Some(1.0 / avg),
        _ => {
            let secs = elapsed.as_secs_f64();
            (secs > 0.0 && n > 0).then(|| n as f64 / secs)
        }
    }
}

const UNSET: u64 = u64::MAX;

/// Smoothed seconds per iteration, readable from any thread.
#[derive(Debug, Clone)]
pub struct SharedAvg(Arc<AtomicU64>);

impl Default for SharedAvg {
    fn default() -> Self {
        Self(Arc::new(AtomicU64::new(UNSET)))
    }
}

impl SharedAvg {
    pub fn get(&self) -> Option<f64> {
        match self.0.load(Ordering::Relaxed) {
            UNSET => None,
            bits => Some(f64::from_bits(bits)),
        }
    }

    pub fn set(&self, avg: Option<f64>) {
        let bits = avg.map_or(UNSET, f64::to_bits);
        self.0.store(bits, Ordering::Relaxed);
    }
}

/// Redraw cadence thresholds, in seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cadence {
    pub mininterval: f64,
    pub maxinterval: f64,
    pub smoothing: f64,
}

impl Cadence {
    /// New `miniters` after a repaint that covered `delta_it` iterations in
    /// `delta_t` seconds.
    ///
    /// A breach of `maxinterval` rescales by rule of three and ignores
    /// smoothing. Otherwise the threshold is EMA-blended toward the
    /// `mininterval` cadence, or without smoothing only ever ratchets up.
    pub fn retune(&self, miniters: f64, delta_it: u64, delta_t: f64) -> f64 {
        let delta_it = delta_it as f64;
        if self.maxinterval > 0.0 && delta_t >= self.maxinterval {
            let target = if self.mininterval > 0.0 {
                self.mininterval
            } else {
                self.maxinterval
            };
            delta_it * target / delta_t
        } else if self.smoothing > 0.0 {
            let scale = if self.mininterval > 0.0 && delta_t > 0.0 {
                self.mininterval / delta_t
            } else {
                1.0
            };
            self.smoothing * delta_it * scale + (1.0 - self.smoothing) * miniters
        } else {
            miniters.max(delta_it)
        }
    }
}
