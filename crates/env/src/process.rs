//! Process-wide environment store
//!
//! The first mutating call promotes the inherited environment into an owned
//! [`EnvTable`]; from then on the table is the source of truth. Every
//! committed mutation is mirrored into the real process environment under
//! the same lock, so any child spawned afterwards observes the table's
//! current state rather than a snapshot. A failed promotion publishes
//! nothing and the inherited environment stays in effect.

use crate::table::EnvTable;
use once_cell::sync::Lazy;
use std::sync::RwLock;
use tracing::debug;
use warden_core::{Error, Result};

/// Global RwLock for the table, since reads are much more common than writes
static TABLE: Lazy<RwLock<Option<EnvTable>>> = Lazy::new(|| RwLock::new(None));

/// Serialized environment variable operations for the whole process
pub struct ProcessEnv;

impl ProcessEnv {
    /// Set an environment variable, promoting the inherited environment on
    /// first use
    pub fn set_var<K: AsRef<str>, V: AsRef<str>>(key: K, value: V) -> Result<()> {
        let mut guard = TABLE.write().map_err(|e| {
            Error::environment(
                key.as_ref(),
                format!("failed to acquire environment write lock: {e}"),
            )
        })?;

        let table = promoted(&mut guard)?;
        table.set(key.as_ref(), value.as_ref())?;

        // Mirror into the real environment so spawned children inherit it
        std::env::set_var(key.as_ref(), value.as_ref());
        Ok(())
    }

    /// Remove an environment variable. Removing an absent key succeeds.
    pub fn remove_var<K: AsRef<str>>(key: K) -> Result<()> {
        let mut guard = TABLE.write().map_err(|e| {
            Error::environment(
                key.as_ref(),
                format!("failed to acquire environment write lock: {e}"),
            )
        })?;

        let table = promoted(&mut guard)?;
        table.unset(key.as_ref());

        std::env::remove_var(key.as_ref());
        Ok(())
    }

    /// Current value of a variable, read from the table once promoted and
    /// from the inherited environment before that
    pub fn var<K: AsRef<str>>(key: K) -> Result<Option<String>> {
        let guard = TABLE.read().map_err(|e| {
            Error::environment(
                key.as_ref(),
                format!("failed to acquire environment read lock: {e}"),
            )
        })?;

        match guard.as_ref() {
            Some(table) => Ok(table.get(key.as_ref()).map(str::to_owned)),
            None => Ok(std::env::var(key.as_ref()).ok()),
        }
    }

    /// Snapshot of all variables as owned pairs
    pub fn vars() -> Result<Vec<(String, String)>> {
        let guard = TABLE.read().map_err(|e| {
            Error::environment("*", format!("failed to acquire environment read lock: {e}"))
        })?;

        match guard.as_ref() {
            Some(table) => Ok(table
                .vars()
                .map(|(k, v)| (k.to_owned(), v.to_owned()))
                .collect()),
            None => Ok(std::env::vars().collect()),
        }
    }
}

/// The promoted table, building it from the inherited environment on the
/// first mutating call
fn promoted(slot: &mut Option<EnvTable>) -> Result<&mut EnvTable> {
    match slot {
        Some(table) => Ok(table),
        None => {
            let table = slot.insert(EnvTable::from_inherited()?);
            debug!(count = table.len(), "environment table promoted");
            Ok(table)
        }
    }
}
