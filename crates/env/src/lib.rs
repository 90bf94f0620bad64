//! Process-wide environment store for warden
//!
//! Two layers: [`table::EnvTable`] is the owned `KEY=value` container with
//! explicit capacity management, and [`process::ProcessEnv`] is the
//! process-wide singleton that promotes the inherited environment on first
//! mutation and mirrors every committed change into the real process
//! environment so spawned children see current state.

pub mod process;
pub mod table;

pub use process::ProcessEnv;
pub use table::EnvTable;
