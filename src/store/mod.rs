//! Config Store
//!
//! Owns every parsed entry and answers wildcard lookups.
//!
//! ## Storage order
//!
//! Entries are kept in file order and always scanned back-to-front, so the
//! store behaves as newest-first: among duplicate or overlapping keys the
//! line nearest the end of the file wins single-value lookups and comes
//! first in list lookups.
//!
//! ## Lifetime
//!
//! Lookups hand out `&str` views tied to the store. `release` consumes the
//! store, so a released store can neither be queried nor released again.

mod load;

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::matcher::{Wildcard, wildcard_match};
use crate::types::{CupidError, Entry, Result};

#[derive(Debug, Clone, Default)]
pub struct ConfigStore {
    /// File order; scanned in reverse
    entries: Vec<Entry>,
    source: Option<PathBuf>,
}

impl ConfigStore {
    /// An empty store
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolved path the store was loaded from, if it came from a file
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Entries in storage order (last file line first)
    pub fn entries(&self) -> impl ExactSizeIterator<Item = &Entry> + DoubleEndedIterator {
        self.entries.iter().rev()
    }

    /// Value of the first entry, in storage order, whose key matches `pattern`.
    pub fn get(&self, pattern: &str) -> Option<&str> {
        let wildcard = Wildcard::new(pattern);
        self.entries()
            .find(|entry| wildcard.matches(entry.key()))
            .map(Entry::value)
    }

    /// Values of every entry whose key matches `pattern`, in storage order.
    ///
    /// No match is `Ok` with an empty `Vec`; only a failed allocation of the
    /// result is an error.
    pub fn get_list(&self, pattern: &str) -> Result<Vec<&str>> {
        let wildcard = Wildcard::new(pattern);
        let count = self
            .entries()
            .filter(|entry| wildcard.matches(entry.key()))
            .count();

        let mut values = Vec::new();
        if count == 0 {
            return Ok(values);
        }
        values
            .try_reserve_exact(count)
            .map_err(|e| CupidError::allocation("collecting matching values", e))?;
        values.extend(
            self.entries()
                .filter(|entry| wildcard.matches(entry.key()))
                .map(Entry::value),
        );
        Ok(values)
    }

    /// Whether any value stored under exactly `key`, read as a wildcard
    /// pattern, matches `candidate`.
    ///
    /// ```ignore
    /// // ignore = *.txt
    /// // ignore = build_*
    /// assert!(store.value_in_list("ignore", "notes.txt"));
    /// ```
    pub fn value_in_list(&self, key: &str, candidate: &str) -> bool {
        self.entries()
            .filter(|entry| entry.key() == key)
            .any(|entry| wildcard_match(entry.value(), candidate))
    }

    /// Free the store and everything it owns. Equivalent to dropping it.
    pub fn release(self) {
        debug!(entries = self.entries.len(), "Releasing config store");
    }
}

impl FromIterator<Entry> for ConfigStore {
    /// Collect entries given in file order
    fn from_iter<I: IntoIterator<Item = Entry>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
            source: None,
        }
    }
}
