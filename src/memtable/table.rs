//! MemTable implementation
//!
//! HashMap-based table owned by a single store.

use std::collections::hash_map::{self, HashMap};

use tracing::trace;

use crate::error::Result;
use crate::wal::{AppendLog, ReplayCursor};

/// In-memory key -> value mapping
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MemTable {
    data: HashMap<String, String>,
}

/// Outcome of folding a log into a table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplayStats {
    /// Records applied by this replay
    pub records_applied: u64,

    /// Cursor where replay stopped (end of the last complete record)
    pub end: ReplayCursor,
}

impl MemTable {
    /// Create a new empty MemTable
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a value by key
    pub fn get(&self, key: &str) -> Option<&str> {
        self.data.get(key).map(String::as_str)
    }

    /// Insert or overwrite a key, returning the previous value
    pub fn insert(&mut self, key: String, value: String) -> Option<String> {
        self.data.insert(key, value)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Iterate over all entries, in no particular order
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            inner: self.data.iter(),
        }
    }

    /// Fold every remaining record of `log` into the table.
    ///
    /// Later records for a key overwrite earlier ones. Stops cleanly at
    /// end-of-log; read errors are propagated and records applied before the
    /// error stay applied.
    pub fn apply_log(&mut self, log: &mut AppendLog) -> Result<ReplayStats> {
        let mut records_applied = 0;
        while let Some(record) = log.read_next_record()? {
            let (key, value) = record.into_parts();
            trace!(key = %key, "replayed record");
            self.data.insert(key, value);
            records_applied += 1;
        }

        Ok(ReplayStats {
            records_applied,
            end: log.cursor(),
        })
    }
}

/// Iterator over MemTable entries
pub struct Iter<'a> {
    inner: hash_map::Iter<'a, String, String>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a str, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}
