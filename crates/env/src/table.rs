//! Owned environment table with explicit capacity management
//!
//! Entries are `KEY=value` strings, each heap-owned by the table; once built
//! from the inherited environment, nothing here aliases the process's
//! original storage. Capacity always stays strictly ahead of the entry
//! count, reserving room for the terminator slot consumers of the inherited
//! format expect and for one future append without an immediate
//! reallocation. Every growth path reserves fallibly: a failed reservation
//! surfaces as out-of-memory and leaves the previously committed entries
//! untouched.

use std::ffi::OsString;
use tracing::debug;
use warden_core::{Error, Result, ENV_GROWTH_SLACK};

/// A table of `KEY=value` entries owned independently of the process's
/// inherited environment.
#[derive(Debug, Clone)]
pub struct EnvTable {
    entries: Vec<String>,
}

impl EnvTable {
    /// An empty table with the usual slack reserved
    pub fn new() -> Result<Self> {
        let mut entries = Vec::new();
        entries
            .try_reserve_exact(ENV_GROWTH_SLACK)
            .map_err(|_| Error::out_of_memory("environment table creation"))?;
        Ok(Self { entries })
    }

    /// Snapshot the process's inherited environment into owned storage.
    ///
    /// Inherited entries that are not valid UTF-8 are skipped. On any
    /// allocation failure no partial table is returned; the inherited
    /// environment stays the de facto one.
    pub fn from_inherited() -> Result<Self> {
        let inherited: Vec<(OsString, OsString)> = std::env::vars_os().collect();

        let mut entries = Vec::new();
        entries
            .try_reserve_exact(inherited.len() + ENV_GROWTH_SLACK)
            .map_err(|_| Error::out_of_memory("environment table promotion"))?;

        for (key, value) in &inherited {
            let (Some(key), Some(value)) = (key.to_str(), value.to_str()) else {
                continue;
            };
            entries.push(make_entry(key, value)?);
        }

        debug!(
            count = entries.len(),
            capacity = entries.capacity(),
            "promoted inherited environment to owned storage"
        );
        Ok(Self { entries })
    }

    /// Value for `key`, matching exactly up to the `=` delimiter
    pub fn get(&self, key: &str) -> Option<&str> {
        let index = self.position(key)?;
        Some(&self.entries[index][key.len() + 1..])
    }

    /// Insert `key=value`, replacing any existing entry for `key` in place.
    ///
    /// Replacement rebuilds the entry string even when the value is
    /// unchanged; skipping that rebuild would be an optimization, not a
    /// correctness requirement. On failure the table keeps its prior state.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        // A key with a delimiter or NUL could never be read back, and the
        // process environment this table backs would reject it outright.
        if key.is_empty() || key.contains('=') || key.contains('\0') || value.contains('\0') {
            return Err(Error::environment(
                key,
                "keys must be non-empty and free of '=' and NUL",
            ));
        }

        let entry = make_entry(key, value)?;
        match self.position(key) {
            Some(index) => self.entries[index] = entry,
            None => {
                self.reserve_slack()?;
                self.entries.push(entry);
            }
        }
        Ok(())
    }

    /// Remove `key`, returning whether it was present.
    ///
    /// Removal is non-stable: the last entry moves into the freed slot.
    /// Order carries no contract here. An absent key is a no-op success.
    pub fn unset(&mut self, key: &str) -> bool {
        match self.position(key) {
            Some(index) => {
                self.entries.swap_remove(index);
                true
            }
            None => false,
        }
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table holds no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Slots currently allocated, always strictly greater than [`len`](Self::len)
    /// once the table has been through [`new`](Self::new) or
    /// [`from_inherited`](Self::from_inherited)
    pub fn capacity(&self) -> usize {
        self.entries.capacity()
    }

    /// The raw `KEY=value` entries, in table order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    /// The entries split into `(key, value)` pairs, the surface a
    /// process-spawning caller consumes
    pub fn vars(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().filter_map(|entry| entry.split_once('='))
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.entries.iter().position(|entry| {
            entry.as_bytes().get(key.len()) == Some(&b'=') && entry.starts_with(key)
        })
    }

    /// Keep capacity strictly ahead of the count: one slot for the
    /// terminator and one for the next append.
    fn reserve_slack(&mut self) -> Result<()> {
        if self.entries.capacity() < self.entries.len() + 2 {
            self.entries
                .try_reserve_exact(ENV_GROWTH_SLACK)
                .map_err(|_| Error::out_of_memory("environment table growth"))?;
            debug!(capacity = self.entries.capacity(), "grew environment table");
        }
        Ok(())
    }
}

/// Build an owned `key=value` string, reserving its storage fallibly
fn make_entry(key: &str, value: &str) -> Result<String> {
    let mut entry = String::new();
    entry
        .try_reserve_exact(key.len() + value.len() + 1)
        .map_err(|_| Error::out_of_memory("environment entry construction"))?;
    entry.push_str(key);
    entry.push('=');
    entry.push_str(value);
    Ok(entry)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_then_get_round_trips() {
        let mut table = EnvTable::new().unwrap();
        table.set("FOO", "1").unwrap();
        assert_eq!(table.get("FOO"), Some("1"));

        table.set("FOO", "2").unwrap();
        assert_eq!(table.get("FOO"), Some("2"));

        // Replacement reuses the slot: still exactly one entry
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn key_match_stops_at_delimiter() {
        let mut table = EnvTable::new().unwrap();
        table.set("PATHLIKE", "long").unwrap();
        table.set("PATH", "short").unwrap();

        assert_eq!(table.get("PATH"), Some("short"));
        assert_eq!(table.get("PATHLIKE"), Some("long"));
        assert_eq!(table.get("PAT"), None);
    }

    #[test]
    fn unset_removes_exactly_one_entry() {
        let mut table = EnvTable::new().unwrap();
        table.set("BAR", "x").unwrap();
        table.set("BAZ", "y").unwrap();

        assert!(table.unset("BAR"));
        assert_eq!(table.get("BAR"), None);
        assert_eq!(table.len(), 1);
        // The survivor is untouched, wherever it now sits
        assert_eq!(table.get("BAZ"), Some("y"));
    }

    #[test]
    fn unset_of_absent_key_is_a_no_op() {
        let mut table = EnvTable::new().unwrap();
        table.set("KEEP", "v").unwrap();

        assert!(!table.unset("NEVER_SET"));
        assert_eq!(table.len(), 1);
        assert_eq!(table.get("KEEP"), Some("v"));
    }

    #[test]
    fn growth_past_several_increments_preserves_every_key() {
        let mut table = EnvTable::new().unwrap();
        let count = ENV_GROWTH_SLACK * 4 + 3;

        for i in 0..count {
            table.set(&format!("GROW_{i}"), &i.to_string()).unwrap();
        }

        assert_eq!(table.len(), count);
        assert!(table.capacity() > table.len());
        for i in 0..count {
            assert_eq!(table.get(&format!("GROW_{i}")).unwrap(), i.to_string());
        }
    }

    #[test]
    fn capacity_stays_ahead_of_count() {
        let mut table = EnvTable::new().unwrap();
        assert!(table.capacity() > table.len());

        for i in 0..ENV_GROWTH_SLACK * 2 {
            table.set(&format!("K{i}"), "v").unwrap();
            assert!(table.capacity() > table.len());
        }
    }

    #[test]
    fn from_inherited_owns_the_current_environment() {
        // The test runner always has at least PATH or HOME around; assert
        // against a variable this test controls instead.
        std::env::set_var("WARDEN_TABLE_PROMOTE_PROBE", "here");
        let table = EnvTable::from_inherited().unwrap();
        std::env::remove_var("WARDEN_TABLE_PROMOTE_PROBE");

        assert_eq!(table.get("WARDEN_TABLE_PROMOTE_PROBE"), Some("here"));
        assert!(table.capacity() > table.len());
    }

    #[test]
    fn malformed_keys_are_rejected() {
        let mut table = EnvTable::new().unwrap();

        assert!(matches!(
            table.set("BAD=KEY", "v"),
            Err(Error::Environment { .. })
        ));
        assert!(matches!(table.set("", "v"), Err(Error::Environment { .. })));
        assert!(table.is_empty());
    }

    #[test]
    fn vars_splits_entries_into_pairs() {
        let mut table = EnvTable::new().unwrap();
        table.set("A", "1").unwrap();
        table.set("B", "2=3").unwrap();

        let pairs: Vec<_> = table.vars().collect();
        assert!(pairs.contains(&("A", "1")));
        // Values keep embedded delimiters intact
        assert!(pairs.contains(&("B", "2=3")));
    }
}
