//! Display implementations for error types

use super::types::Error;
use std::fmt;

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::LockBusy { path } => {
                write!(f, "lock '{}' is held by a live owner", path.display())
            }
            Error::LockReclaimFailed { path, source } => {
                write!(
                    f,
                    "failed to reclaim stale lock '{}': {}",
                    path.display(),
                    source
                )
            }
            Error::OutOfMemory { operation } => {
                write!(f, "out of memory during {operation}")
            }
            Error::Environment { variable, message } => {
                write!(f, "environment variable '{variable}' error: {message}")
            }
            Error::FileSystem {
                path,
                operation,
                source,
            } => {
                write!(
                    f,
                    "file system {} operation failed for '{}': {}",
                    operation,
                    path.display(),
                    source
                )
            }
            Error::Configuration { message } => {
                write!(f, "configuration error: {message}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn display_includes_path_and_cause() {
        let err = Error::lock_reclaim_failed(
            "/run/game.lock",
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        let rendered = err.to_string();
        assert!(rendered.contains("/run/game.lock"));
        assert!(rendered.contains("denied"));
    }
}
