//! Conversion implementations for error types

use super::types::Error;
use std::collections::TryReserveError;
use std::path::PathBuf;

// Conversion implementations (keeping these as they provide more context than
// thiserror's #[from])
impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Error::FileSystem {
            path: PathBuf::new(),
            operation: "unknown".to_string(),
            source: error,
        }
    }
}

impl From<TryReserveError> for Error {
    fn from(_: TryReserveError) -> Self {
        Error::OutOfMemory {
            operation: "allocation".to_string(),
        }
    }
}
