use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};

/// Name of the lock file inside the data directory
pub const LOCK_FILE: &str = ".lock";

/// How long writers wait for each other by default
pub const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_secs(5);

const RETRY_INTERVAL: Duration = Duration::from_millis(10);

/// Exclusive advisory lock held for one read-modify-write cycle on a data
/// directory.
///
/// The lock file is created once and never removed: every writer must flock
/// the same inode. Closing the handle on drop releases the lock.
#[derive(Debug)]
pub struct WriteLock {
    _file: File,
    path: PathBuf,
}

/// Error type for acquiring the write lock
#[derive(Debug, thiserror::Error)]
pub enum LockError {
    #[error("could not open lock file {path}: {source}")]
    Open { path: PathBuf, source: io::Error },
    #[error("waited {waited:?} for {path}: another lysta process is writing")]
    Busy { path: PathBuf, waited: Duration },
}

impl WriteLock {
    /// Lock `data_dir`, retrying until `timeout` elapses.
    pub fn acquire(data_dir: &Path, timeout: Duration) -> Result<Self, LockError> {
        let path = data_dir.join(LOCK_FILE);
        let file = match OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(&path)
        {
            Ok(file) => file,
            Err(source) => return Err(LockError::Open { path, source }),
        };

        let started = Instant::now();
        loop {
            match try_exclusive(&file) {
                Ok(true) => {
                    tracing::debug!(
                        path = %path.display(),
                        waited_ms = started.elapsed().as_millis() as u64,
                        "write lock acquired"
                    );
                    return Ok(WriteLock { _file: file, path });
                }
                Ok(false) if started.elapsed() < timeout => thread::sleep(RETRY_INTERVAL),
                Ok(false) => {
                    let waited = started.elapsed();
                    tracing::debug!(path = %path.display(), ?waited, "write lock busy");
                    return Err(LockError::Busy { path, waited });
                }
                Err(source) => return Err(LockError::Open { path, source }),
            }
        }
    }

    pub fn acquire_default(data_dir: &Path) -> Result<Self, LockError> {
        Self::acquire(data_dir, DEFAULT_LOCK_TIMEOUT)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for WriteLock {
    fn drop(&mut self) {
        tracing::trace!(path = %self.path.display(), "write lock released");
    }
}

/// Non-blocking exclusive flock. `Ok(false)` means another handle holds it.
#[cfg(unix)]
fn try_exclusive(file: &File) -> io::Result<bool> {
    use std::os::unix::io::AsRawFd;
    // SAFETY: the descriptor stays open for the duration of the call
    let rc = unsafe { libc::flock(file.as_raw_fd(), libc::LOCK_EX | libc::LOCK_NB) };
    if rc == 0 {
        return Ok(true);
    }
    let err = io::Error::last_os_error();
    if err.kind() == io::ErrorKind::WouldBlock {
        Ok(false)
    } else {
        Err(err)
    }
}

#[cfg(not(unix))]
fn try_exclusive(_file: &File) -> io::Result<bool> {
    Ok(true)
}
