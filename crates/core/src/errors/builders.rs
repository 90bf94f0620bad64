//! Builder methods for creating errors with context

use super::types::Error;
use std::path::PathBuf;

// Helper methods for creating errors with context
impl Error {
    /// Create a busy-lock error
    #[must_use]
    pub fn lock_busy(path: impl Into<PathBuf>) -> Self {
        Error::LockBusy { path: path.into() }
    }

    /// Create a failed-reclaim error from the delete that refused
    #[must_use]
    pub fn lock_reclaim_failed(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::LockReclaimFailed {
            path: path.into(),
            source,
        }
    }

    /// Create an out-of-memory error naming the operation that failed
    #[must_use]
    pub fn out_of_memory(operation: impl Into<String>) -> Self {
        Error::OutOfMemory {
            operation: operation.into(),
        }
    }

    /// Create an environment variable error
    #[must_use]
    pub fn environment(variable: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Environment {
            variable: variable.into(),
            message: message.into(),
        }
    }

    /// Create a file system error with context
    #[must_use]
    pub fn file_system(
        path: impl Into<PathBuf>,
        operation: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        Error::FileSystem {
            path: path.into(),
            operation: operation.into(),
            source,
        }
    }

    /// Create a configuration error
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Error::Configuration {
            message: message.into(),
        }
    }
}
