//! Signal disposition helpers
//!
//! Covers the three dispositions the surrounding tooling needs: reset
//! everything to default, route termination signals to a shared flag, and
//! mark a critical section. Critical sections are currently a documented
//! no-op: the interrupt masking they once performed is disabled pending a
//! fix for a platform fault, so callers must tolerate signals arriving
//! inside the section.

use warden_core::Result;

#[cfg(unix)]
use signal_hook::consts::{SIGHUP, SIGINT, SIGPIPE, SIGQUIT};
#[cfg(unix)]
use std::sync::atomic::AtomicBool;
#[cfg(unix)]
use std::sync::Arc;
#[cfg(unix)]
use warden_core::Error;

/// Signals a terminating process cares about
#[cfg(unix)]
const EXIT_SIGNALS: [libc::c_int; 4] = [SIGHUP, SIGINT, SIGPIPE, SIGQUIT];

/// Restore the exit signals to their default dispositions
#[cfg(unix)]
pub fn reset_dispositions() {
    for sig in EXIT_SIGNALS {
        unsafe {
            libc::signal(sig, libc::SIG_DFL);
        }
    }
}

#[cfg(not(unix))]
pub fn reset_dispositions() {}

/// Raise `flag` when any exit signal arrives.
///
/// Signals the parent process already ignores stay ignored, so a job
/// spawned with signals masked keeps them masked.
#[cfg(unix)]
pub fn install_exit_handler(flag: &Arc<AtomicBool>) -> Result<()> {
    for sig in EXIT_SIGNALS {
        let previous = unsafe { libc::signal(sig, libc::SIG_IGN) };
        if previous == libc::SIG_IGN {
            continue;
        }
        signal_hook::flag::register(sig, Arc::clone(flag)).map_err(|e| {
            Error::configuration(format!("failed to register handler for signal {sig}: {e}"))
        })?;
    }
    Ok(())
}

#[cfg(not(unix))]
pub fn install_exit_handler(_flag: &std::sync::Arc<std::sync::atomic::AtomicBool>) -> Result<()> {
    Ok(())
}

/// Guard for a section that should not be interrupted by exit signals.
/// See the module docs: masking is currently disabled.
#[derive(Debug)]
pub struct CriticalSection(());

/// Enter a critical section. The guard ends it when dropped.
#[must_use]
pub fn critical() -> CriticalSection {
    CriticalSection(())
}
