//! Shared constants for warden crates

use std::time::Duration;

/// Number of creation retries before lock acquisition consults staleness
pub const LOCK_POLL_ATTEMPTS: u32 = 60;

/// Delay between lock creation retries
pub const LOCK_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Extra entry slots reserved whenever the environment table is created
/// or grown, so an append never forces an immediate reallocation
pub const ENV_GROWTH_SLACK: usize = 5;
