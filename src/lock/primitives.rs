//! The primitives a [`WriteLock`](super::WriteLock) is composed of.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

#[cfg(unix)]
pub use self::unix::ProcessLock;

/// A held lock. Dropping it releases the lock.
pub trait Held {}

impl<T: ?Sized> Held for T {}

/// A mutual-exclusion primitive that can take part in a [`WriteLock`].
///
/// [`WriteLock`]: super::WriteLock
pub trait LockPrimitive: fmt::Debug + Send + Sync {
    /// Short name used in logs.
    fn kind(&self) -> &'static str;

    /// Block until the lock is held.
    fn lock(&self) -> Box<dyn Held + '_>;
}

impl<T: LockPrimitive + ?Sized> LockPrimitive for Arc<T> {
    fn kind(&self) -> &'static str {
        (**self).kind()
    }

    fn lock(&self) -> Box<dyn Held + '_> {
        (**self).lock()
    }
}

/// Cross-thread lock.
#[derive(Debug, Default)]
pub struct ThreadLock {
    inner: Mutex<()>,
}

impl ThreadLock {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LockPrimitive for ThreadLock {
    fn kind(&self) -> &'static str {
        "thread"
    }

    fn lock(&self) -> Box<dyn Held + '_> {
        // A panic while repainting must not stop every other bar from drawing.
        Box::new(self.inner.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

#[cfg(unix)]
mod unix {
    use std::env;
    use std::fmt;
    use std::fs::{File, OpenOptions};
    use std::io;
    use std::mem;
    use std::os::unix::io::AsRawFd;
    use std::path::{Path, PathBuf};
    use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

    use tracing::debug;

    use super::{Held, LockPrimitive};

    /// Cross-process lock backed by an exclusive `fcntl` record lock.
    ///
    /// Record locks belong to the process, so forked workers that inherit the
    /// descriptor still exclude each other. Threads of one process would not,
    /// which is why the file sits behind a mutex.
    ///
    /// Closing *any* descriptor of the file drops every record lock the
    /// process holds on it. Bars therefore all go through [`shared`], the one
    /// instance a process keeps open for its whole life.
    ///
    /// [`shared`]: ProcessLock::shared
    pub struct ProcessLock {
        path: PathBuf,
        file: Mutex<File>,
    }

    impl fmt::Debug for ProcessLock {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.debug_struct("ProcessLock")
                .field("path", &self.path)
                .finish()
        }
    }

    impl ProcessLock {
        /// Prefix of the lock file name, followed by the user and process group.
        pub const FILE_PREFIX: &'static str = "bunny-write";

        /// Open (or create) the lock file at `path`.
        ///
        /// Opening the file behind [`shared`](ProcessLock::shared) a second
        /// time and dropping it releases the shared lock.
        pub fn open<P: AsRef<Path>>(path: P) -> io::Result<Self> {
            let path = path.as_ref().to_path_buf();
            let file = OpenOptions::new()
                .read(true)
                .write(true)
                .create(true)
                .truncate(false)
                .open(&path)?;
            Ok(Self {
                path,
                file: Mutex::new(file),
            })
        }

        /// Open the default lock file in the temp directory, if possible.
        pub fn detect() -> Option<Self> {
            let path = Self::default_path();
            match Self::open(&path) {
                Ok(lock) => Some(lock),
                Err(e) => {
                    debug!("Process lock unavailable at {:?}: {}", path, e);
                    None
                }
            }
        }

        /// The process-wide lock on [`default_path`](ProcessLock::default_path).
        ///
        /// Opened once; every caller gets the same instance.
        pub fn shared() -> Option<Arc<ProcessLock>> {
            static SHARED: OnceLock<Option<Arc<ProcessLock>>> = OnceLock::new();
            SHARED.get_or_init(|| Self::detect().map(Arc::new)).clone()
        }

        /// Lock file shared by this user's processes in the current process
        /// group, so a job and its workers contend while unrelated programs
        /// and other users do not.
        pub fn default_path() -> PathBuf {
            // SAFETY: both calls always succeed.
            let (uid, pgrp) = unsafe { (libc::getuid(), libc::getpgrp()) };
            env::temp_dir().join(format!("{}-{uid}-{pgrp}.lock", Self::FILE_PREFIX))
        }

        pub fn path(&self) -> &Path {
            &self.path
        }

        /// Take the lock without waiting.
        ///
        /// Returns `Ok(None)` when another process holds it.
        pub fn try_lock(&self) -> io::Result<Option<Box<dyn Held + '_>>> {
            let file = self.file.lock().unwrap_or_else(PoisonError::into_inner);
            match set_record_lock(&file, libc::F_WRLCK as libc::c_short, false) {
                Ok(()) => Ok(Some(Box::new(RecordGuard { file, locked: true }))),
                Err(e) if is_contended(&e) => Ok(None),
                Err(e) => Err(e),
            }
        }
    }

    fn is_contended(err: &io::Error) -> bool {
        matches!(err.raw_os_error(), Some(libc::EAGAIN) | Some(libc::EACCES))
    }

    fn set_record_lock(file: &File, kind: libc::c_short, wait: bool) -> io::Result<()> {
        let cmd = if wait { libc::F_SETLKW } else { libc::F_SETLK };
        // SAFETY: an all-zero `flock` is valid; l_start = l_len = 0 spans the whole file.
        let mut region: libc::flock = unsafe { mem::zeroed() };
        region.l_type = kind;
        region.l_whence = libc::SEEK_SET as libc::c_short;
        loop {
            let rc = unsafe {
                libc::fcntl(
                    file.as_raw_fd(),
                    cmd,
                    &mut region as *mut libc::flock,
                )
            };
            if rc != -1 {
                return Ok(());
            }
            let err = io::Error::last_os_error();
            if err.kind() != io::ErrorKind::Interrupted {
                return Err(err);
            }
        }
    }

    struct RecordGuard<'a> {
        file: MutexGuard<'a, File>,
        locked: bool,
    }

    impl Drop for RecordGuard<'_> {
        fn drop(&mut self) {
            if self.locked {
                if let Err(e) = set_record_lock(&self.file, libc::F_UNLCK as libc::c_short, false) {
                    debug!("Failed to release process lock: {}", e);
                }
            }
        }
    }

    impl LockPrimitive for ProcessLock {
        fn kind(&self) -> &'static str {
            "process"
        }

        fn lock(&self) -> Box<dyn Held + '_> {
            let file = self.file.lock().unwrap_or_else(PoisonError::into_inner);
            let locked = match set_record_lock(&file, libc::F_WRLCK as libc::c_short, true) {
                Ok(()) => true,
                Err(e) => {
                    debug!("Failed to take process lock on {:?}: {}", self.path, e);
                    false
                }
            };
            Box::new(RecordGuard { file, locked })
        }
    }
}
