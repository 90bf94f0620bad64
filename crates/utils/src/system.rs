//! Thin wrappers over single OS queries
//!
//! Nothing here holds state; each function is one stat or passwd lookup with
//! the workspace error type at the boundary.

use std::fs::{self, File, OpenOptions};
use std::path::Path;
use warden_core::{Error, Result};

/// Whether the named file exists
pub fn file_exists(path: impl AsRef<Path>) -> bool {
    fs::metadata(path).is_ok()
}

/// Length of a file in bytes, `None` if it cannot be stat'ed
pub fn file_length(path: impl AsRef<Path>) -> Option<u64> {
    fs::metadata(path).ok().map(|metadata| metadata.len())
}

/// Name of the user owning this process
pub fn current_username() -> Result<String> {
    users::get_current_username()
        .and_then(|name| name.into_string().ok())
        .ok_or_else(|| Error::configuration("current uid has no usable passwd entry"))
}

/// Create a file readable by everyone, for shared logs and score files
pub fn create_world_readable(path: impl AsRef<Path>) -> Result<File> {
    let path = path.as_ref();
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o666);
    }

    options
        .open(path)
        .map_err(|e| Error::file_system(path, "create world-readable file", e))
}
