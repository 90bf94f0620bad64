//! Core error type definitions

use std::path::PathBuf;

/// Result type alias for warden operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for warden operations using thiserror
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A lock marker is held by a live (non-stale) owner
    LockBusy { path: PathBuf },

    /// A stale lock marker was detected but force-deleting it failed
    LockReclaimFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Allocation or reservation failure in the environment table
    OutOfMemory { operation: String },

    /// Environment variable related errors
    Environment { variable: String, message: String },

    /// File system operations
    FileSystem {
        path: PathBuf,
        operation: String,
        #[source]
        source: std::io::Error,
    },

    /// Configuration errors
    Configuration { message: String },
}
