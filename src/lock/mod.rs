//! Mutual exclusion around terminal writes.
//!
//! Several bars can share one terminal, whether they live in sibling threads
//! or in separate worker processes. The [`WriteLock`] serializes the short
//! critical section in which a bar moves the cursor to its row and repaints
//! its line.
//!
//! A lock is made of up to two primitives:
//!
//! - [`ProcessLock`], an advisory record lock on a shared lock file (Unix only)
//! - [`ThreadLock`], a plain in-process mutex
//!
//! They are always acquired process-level first and released in the reverse
//! order. Bars share [`WriteLock::shared`] by default, and a process never
//! holds more than one [`ProcessLock`] on its default file.
//!
//! # Examples
//!
//! ```rust
//! use std::sync::Arc;
//! use bunny::lock::WriteLock;
//!
//! let lock = WriteLock::shared();
//! assert!(Arc::ptr_eq(&lock, &WriteLock::shared()));
//! lock.with(|| {
//!     // repaint something
//! });
//! ```

pub(crate) mod primitives;
pub(crate) mod write_lock;

#[cfg(unix)]
pub use primitives::ProcessLock;
pub use primitives::{Held, LockPrimitive, ThreadLock};
pub use write_lock::{WriteLock, WriteLockGuard};
