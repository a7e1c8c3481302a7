//! Configuration structures and defaults for a bunny.
//!
//! # Examples
//!
//! ```rust
//! use std::time::Duration;
//! use bunny::wrapper::BunnyConfig;
//!
//! let config = BunnyConfig {
//!     total: Some(100),
//!     mininterval: Duration::from_millis(50),
//!     ..BunnyConfig::default()
//! };
//! assert!(config.is_dynamic_miniters());
//! ```

use std::sync::Arc;
use std::time::Duration;

use crate::lock::WriteLock;
use crate::progress::BarStyle;
use crate::rate::Cadence;

/// Configuration structure for a bunny.
#[derive(Clone)]
pub struct BunnyConfig {
    /// Minimum time between two repaints of the progress line.
    pub mininterval: Duration,
    /// Maximum time between two repaints; `Duration::ZERO` disables it.
    pub maxinterval: Duration,
    /// Fixed number of iterations between clock checks. `None` lets the
    /// wrapper adjust it as it learns the iteration rate.
    pub miniters: Option<u64>,
    /// EMA weight of the newest sample, between 0 (overall average) and 1
    /// (instantaneous rate).
    pub smoothing: f64,
    /// Expected number of iterations.
    pub total: Option<u64>,
    /// Walk the iterator without drawing anything.
    pub disable: bool,
    /// Row offset of the progress line, for several bars on one terminal.
    pub position: usize,
    /// How the progress line looks.
    pub style: BarStyle,
    /// Wake-up period of the monitor thread; `Duration::ZERO` disables it.
    pub monitor_interval: Duration,
    /// Legacy GUI mode. Always rejected at build time.
    pub gui: bool,
    /// Lock shared with other bars writing to the same terminal.
    pub write_lock: Option<Arc<WriteLock>>,
}

impl std::fmt::Debug for BunnyConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BunnyConfig")
            .field("mininterval", &self.mininterval)
            .field("maxinterval", &self.maxinterval)
            .field("miniters", &self.miniters)
            .field("smoothing", &self.smoothing)
            .field("total", &self.total)
            .field("disable", &self.disable)
            .field("position", &self.position)
            .field("style", &self.style)
            .field("monitor_interval", &self.monitor_interval)
            .field("gui", &self.gui)
            .field("write_lock", &self.write_lock.is_some())
            .finish()
    }
}

impl Default for BunnyConfig {
    fn default() -> Self {
        Self {
            mininterval: Duration::from_millis(100),
            maxinterval: Duration::from_secs(10),
            miniters: None,
            smoothing: 0.3,
            total: None,
            disable: false,
            position: 0,
            style: BarStyle::default(),
            monitor_interval: Duration::from_secs(10),
            gui: false,
            write_lock: None,
        }
    }
}

impl BunnyConfig {
    pub fn is_dynamic_miniters(&self) -> bool {
        self.miniters.is_none()
    }

    /// Starting value of the `miniters` gate.
    pub fn initial_miniters(&self) -> f64 {
        self.miniters.unwrap_or(0) as f64
    }

    pub(crate) fn cadence(&self) -> Cadence {
        Cadence {
            mininterval: self.mininterval.as_secs_f64(),
            maxinterval: self.maxinterval.as_secs_f64(),
            smoothing: self.smoothing,
        }
    }

    /// Whether a monitor thread is worth running.
    pub(crate) fn wants_monitor(&self) -> bool {
        !self.disable && !self.monitor_interval.is_zero() && !self.maxinterval.is_zero()
    }
}
