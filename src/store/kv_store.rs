//! Keyed store
//!
//! An in-memory table whose content can always be rebuilt from its log.

use std::path::Path;

use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::Result;
use crate::memtable::{self, MemTable, ReplayStats};
use crate::wal::{AppendLog, Record};

/// Key-value store backed by an append-only log
///
/// ## Write path
/// 1. Validate the record (no newline in key or value)
/// 2. Append to the log and fsync
/// 3. Insert into the table
///
/// A failure in steps 1 or 2 leaves the table untouched.
///
/// Mutation takes `&mut self`; wrap the store in a
/// [`SharedKvStore`](crate::store::SharedKvStore) to use it from several
/// threads.
#[derive(Debug)]
pub struct KvStore {
    /// Log every mutation goes through first
    log: AppendLog,

    /// Derived state, rebuilt from `log` on recovery
    table: MemTable,
}

impl KvStore {
    /// Create a store with a fresh log in `dir`, named `wal-{uuid}`
    pub fn new(dir: impl AsRef<Path>) -> Result<Self> {
        let config = Config::builder().log_dir(dir.as_ref()).build();
        Self::create(&config)
    }

    /// Create a store with a fresh log in `config.log_dir`
    pub fn create(config: &Config) -> Result<Self> {
        config.validate()?;

        let log = AppendLog::create_in(&config.log_dir, &config.log_prefix)?;
        info!(path = %log.path().display(), "created store");

        Ok(Self {
            log,
            table: MemTable::new(),
        })
    }

    /// Rebuild a store by replaying the log at `path`
    pub fn recreate(path: impl AsRef<Path>) -> Result<Self> {
        Self::recreate_with(path, &Config::default())
    }

    /// Rebuild a store by replaying the log at `path`.
    ///
    /// On startup:
    /// 1. Open the log (created empty if missing)
    /// 2. Replay every complete record into an empty table
    /// 3. Handle a torn tail left by an interrupted append
    /// 4. Ready to serve requests; new appends follow the existing tail
    pub fn recreate_with(path: impl AsRef<Path>, config: &Config) -> Result<Self> {
        let mut store = Self {
            log: AppendLog::open(path)?,
            table: MemTable::new(),
        };

        let stats = store.apply_log()?;

        let torn = store.log.len()?.saturating_sub(stats.end.offset());
        if torn > 0 {
            warn!(
                path = %store.log.path().display(),
                offset = stats.end.offset(),
                bytes = torn,
                "log ends with an incomplete record"
            );
            if config.repair_torn_tail {
                store.log.truncate_to_cursor()?;
            }
        }

        info!(
            path = %store.log.path().display(),
            records = stats.records_applied,
            keys = store.table.len(),
            "recovered store from log"
        );

        Ok(store)
    }

    /// Fold the remaining records of the owned log into the table.
    ///
    /// To replay some other log, use
    /// [`MemTable::apply_log`](crate::memtable::MemTable::apply_log).
    pub fn apply_log(&mut self) -> Result<ReplayStats> {
        self.table.apply_log(&mut self.log)
    }

    /// Get the current value for `key`
    pub fn get(&self, key: &str) -> Option<&str> {
        self.table.get(key)
    }

    /// Durably append `key -> value`, then make it visible
    pub fn put(&mut self, key: impl Into<String>, value: impl Into<String>) -> Result<()> {
        let record = Record::new(key, value)?;

        self.log.append_record(&record)?;

        let (key, value) = record.into_parts();
        self.table.insert(key, value);
        Ok(())
    }

    /// Path of the underlying log file
    pub fn log_path(&self) -> &Path {
        self.log.path()
    }

    /// Number of distinct keys
    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Iterate over all entries, in no particular order
    pub fn iter(&self) -> memtable::Iter<'_> {
        self.table.iter()
    }

    /// Close the store, syncing and releasing the log
    pub fn close(self) -> Result<()> {
        debug!(path = %self.log.path().display(), keys = self.table.len(), "closing store");
        self.log.close()
    }
}
