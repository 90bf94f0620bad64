//! Advisory cross-process lock backed by a filesystem marker
//!
//! The only cross-process atomic primitive relied on here is "create a file
//! iff it does not exist"; mutual exclusion is built entirely on that
//! guarantee. The marker's existence is the lock state, so two independent
//! processes always observe the same truth. A time-based staleness heuristic
//! reclaims markers left behind by crashed holders, since a dead owner can
//! never release.

use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, SystemTime};
use tracing::{debug, warn};
use warden_core::{Error, Result, LOCK_POLL_ATTEMPTS, LOCK_POLL_INTERVAL};

/// Markers carry no content; a mode denying write keeps them from being
/// scribbled on by accident.
#[cfg(unix)]
const MARKER_MODE: u32 = 0o444;

/// Outcome of a single exclusive-create attempt
enum Attempt {
    Acquired,
    Held,
}

/// A held advisory lock. Dropping the guard releases it.
#[derive(Debug)]
pub struct FileLock {
    path: PathBuf,
    released: bool,
}

impl FileLock {
    /// Acquire the lock at `path`, treating markers older than `stale_after`
    /// as abandoned.
    ///
    /// Blocks the calling thread for up to a minute of once-per-second
    /// polling before consulting staleness. There is no cancellation path.
    pub fn acquire(path: impl AsRef<Path>, stale_after: Duration) -> Result<Self> {
        Self::acquire_with(
            path.as_ref(),
            stale_after,
            LOCK_POLL_ATTEMPTS,
            LOCK_POLL_INTERVAL,
        )
    }

    /// [`FileLock::acquire`] with the polling schedule exposed.
    ///
    /// Acquisition is a state machine: polling, then a staleness check, then
    /// either a forced reclaim (which restarts polling from scratch) or a
    /// busy failure.
    pub fn acquire_with(
        path: &Path,
        stale_after: Duration,
        attempts: u32,
        poll_interval: Duration,
    ) -> Result<Self> {
        loop {
            // Polling
            if let Attempt::Acquired = try_create_marker(path)? {
                return Ok(Self::held(path));
            }
            for _ in 0..attempts {
                thread::sleep(poll_interval);
                if let Attempt::Acquired = try_create_marker(path)? {
                    return Ok(Self::held(path));
                }
            }

            // StaleCheck
            let metadata = match fs::metadata(path) {
                Ok(metadata) => metadata,
                Err(_) => {
                    // The marker vanished between the last failed create and
                    // the stat. Benign race: the lock is free.
                    create_marker(path)?;
                    return Ok(Self::held(path));
                }
            };

            let age = marker_age(&metadata);
            if age > stale_after {
                // ForcedReclaim. A refused delete surfaces as failure rather
                // than looping forever.
                warn!(path = %path.display(), ?age, "reclaiming stale lock marker");
                fs::remove_file(path).map_err(|e| Error::lock_reclaim_failed(path, e))?;
                continue;
            }

            debug!(path = %path.display(), ?age, "lock held by a live owner");
            return Err(Error::lock_busy(path));
        }
    }

    /// Release the lock by deleting its marker.
    ///
    /// Idempotent: deleting an already-absent marker (another caller's
    /// staleness reclaim, say) is not an error.
    pub fn release(mut self) {
        self.unlink();
    }

    /// The marker path this lock is held at
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn held(path: &Path) -> Self {
        debug!(path = %path.display(), "lock acquired");
        Self {
            path: path.to_path_buf(),
            released: false,
        }
    }

    fn unlink(&mut self) {
        if !self.released {
            self.released = true;
            let _ = fs::remove_file(&self.path);
        }
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        self.unlink();
    }
}

/// Attempt the exclusive create that underpins the whole scheme
fn try_create_marker(path: &Path) -> Result<Attempt> {
    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(MARKER_MODE);
    }

    match options.open(path) {
        Ok(_) => Ok(Attempt::Acquired),
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Ok(Attempt::Held),
        Err(e) => Err(Error::file_system(path, "create lock marker", e)),
    }
}

/// Unconditional create, used once a vanished marker proves the lock free
fn create_marker(path: &Path) -> Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(MARKER_MODE);
    }

    options
        .open(path)
        .map(|_| ())
        .map_err(|e| Error::file_system(path, "create lock marker", e))
}

/// Age of the marker, saturating to zero for clock skew into the future
fn marker_age(metadata: &fs::Metadata) -> Duration {
    metadata
        .modified()
        .ok()
        .and_then(|mtime| SystemTime::now().duration_since(mtime).ok())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::TempDir;

    const FRESH: Duration = Duration::from_secs(60);
    const TICK: Duration = Duration::from_millis(5);

    #[test]
    fn acquire_release_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("round_trip.lock");

        let lock = FileLock::acquire_with(&path, FRESH, 1, TICK).unwrap();
        assert!(path.exists());
        lock.release();
        assert!(!path.exists());

        // Reacquisition succeeds immediately, with no stale-wait
        let lock = FileLock::acquire_with(&path, FRESH, 1, TICK).unwrap();
        drop(lock);
        assert!(!path.exists());
    }

    #[test]
    fn second_acquire_fails_while_held_and_fresh() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("held.lock");

        let holder = FileLock::acquire_with(&path, FRESH, 1, TICK).unwrap();

        let contender = FileLock::acquire_with(&path, FRESH, 2, TICK);
        assert!(matches!(contender, Err(Error::LockBusy { .. })));

        // The holder's marker survived the contender's failure
        assert!(path.exists());
        drop(holder);
    }

    #[test]
    fn stale_marker_is_reclaimed() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("stale.lock");

        // An abandoned marker, aged past the staleness threshold
        File::create(&path).unwrap();
        thread::sleep(Duration::from_millis(60));

        let lock = FileLock::acquire_with(&path, Duration::from_millis(20), 1, TICK).unwrap();

        // The reclaimed lock left a freshly-created marker behind
        let age = marker_age(&fs::metadata(&path).unwrap());
        assert!(age < Duration::from_millis(50));
        drop(lock);
    }

    #[test]
    fn release_tolerates_missing_marker() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("vanished.lock");

        let lock = FileLock::acquire_with(&path, FRESH, 1, TICK).unwrap();
        fs::remove_file(&path).unwrap();
        lock.release();
        assert!(!path.exists());
    }

    #[test]
    fn marker_is_zero_length() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("empty.lock");

        let lock = FileLock::acquire_with(&path, FRESH, 1, TICK).unwrap();
        assert_eq!(fs::metadata(&path).unwrap().len(), 0);
        drop(lock);
    }
}
