//! File locking and thin system wrappers for warden
//!
//! The lock here is advisory: it is respected only by cooperating callers
//! that go through [`lock::FileLock`]. The remaining modules wrap single OS
//! queries with no internal state.

pub mod lock;
pub mod signals;
pub mod system;

pub use lock::*;
pub use signals::*;
pub use system::*;
