use std::fmt;
use std::sync::{Arc, OnceLock};

use tracing::debug;

use super::primitives::{Held, LockPrimitive, ThreadLock};

/// Process- and thread-safe lock around terminal writes.
///
/// Primitives are acquired in the order they were given and released in the
/// exact reverse order. A lock without primitives turns every operation into
/// a no-op.
pub struct WriteLock {
    primitives: Vec<Box<dyn LockPrimitive>>,
}

impl fmt::Debug for WriteLock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WriteLock")
            .field(
                "primitives",
                &self.primitives.iter().map(|p| p.kind()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl Default for WriteLock {
    fn default() -> Self {
        Self::detect()
    }
}

impl WriteLock {
    /// Build a lock from an explicit list of primitives.
    pub fn new(primitives: Vec<Box<dyn LockPrimitive>>) -> Self {
        Self { primitives }
    }

    /// A lock that never blocks.
    pub fn none() -> Self {
        Self::new(Vec::new())
    }

    /// The lock every bar uses unless it was given its own.
    ///
    /// Built with [`detect`](WriteLock::detect) on first use and kept for the
    /// life of the process.
    pub fn shared() -> Arc<WriteLock> {
        static SHARED: OnceLock<Arc<WriteLock>> = OnceLock::new();
        SHARED.get_or_init(|| Arc::new(Self::detect())).clone()
    }

    /// Build a lock from whatever this platform supports.
    ///
    /// The process-level lock comes first when it is available, and is the
    /// same process-wide [`ProcessLock::shared`](super::ProcessLock::shared)
    /// instance for every detected lock. The thread lock is always present.
    pub fn detect() -> Self {
        let mut primitives: Vec<Box<dyn LockPrimitive>> = Vec::with_capacity(2);

        #[cfg(unix)]
        {
            if let Some(process) = super::ProcessLock::shared() {
                primitives.push(Box::new(process));
            }
        }
        primitives.push(Box::new(ThreadLock::new()));

        let lock = Self::new(primitives);
        debug!("Detected {:?}", lock);
        lock
    }

    /// Number of primitives taken on each acquisition.
    pub fn len(&self) -> usize {
        self.primitives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }

    /// Acquire every primitive, in order.
    ///
    /// The returned guard releases them in reverse order when dropped,
    /// including while unwinding.
    pub fn acquire(&self) -> WriteLockGuard<'_> {
        let mut guard = WriteLockGuard {
            held: Vec::with_capacity(self.primitives.len()),
        };
        for primitive in &self.primitives {
            guard.held.push(primitive.lock());
        }
        guard
    }

    /// Run `f` while holding the lock.
    pub fn with<R, F: FnOnce() -> R>(&self, f: F) -> R {
        let _guard = self.acquire();
        f()
    }
}

/// Scoped acquisition of a [`WriteLock`].
#[must_use = "the lock is released as soon as the guard is dropped"]
pub struct WriteLockGuard<'a> {
    held: Vec<Box<dyn Held + 'a>>,
}

impl fmt::Debug for WriteLockGuard<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WriteLockGuard")
            .field("held", &self.held.len())
            .finish()
    }
}

impl Drop for WriteLockGuard<'_> {
    fn drop(&mut self) {
        // Vec drops front to back; release has to go the other way.
        while let Some(held) = self.held.pop() {
            drop(held);
        }
    }
}
