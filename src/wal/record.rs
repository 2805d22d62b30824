//! WAL Record definitions
//!
//! Defines a single key/value record and its newline framing.

use crate::error::{Result, WalKvError};

/// Terminates every field on disk
pub const SEPARATOR: u8 = b'\n';

/// A single (key, value) pair persisted in the log
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Record {
    key: String,
    value: String,
}

impl Record {
    /// Build a record, rejecting fields that would break framing.
    ///
    /// Empty keys and values are valid.
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Result<Self> {
        let key = key.into();
        let value = value.into();
        check_field("key", &key)?;
        check_field("value", &value)?;
        Ok(Self { key, value })
    }

    /// Build a record from fields already read off a framed log.
    pub(crate) fn from_fields(key: String, value: String) -> Self {
        Self { key, value }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn into_parts(self) -> (String, String) {
        (self.key, self.value)
    }

    /// Number of bytes this record occupies on disk
    pub fn encoded_len(&self) -> usize {
        self.key.len() + self.value.len() + 2
    }

    /// Frame as `key\nvalue\n`
    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.encoded_len());
        buf.extend_from_slice(self.key.as_bytes());
        buf.push(SEPARATOR);
        buf.extend_from_slice(self.value.as_bytes());
        buf.push(SEPARATOR);
        buf
    }
}

fn check_field(name: &str, field: &str) -> Result<()> {
    if field.as_bytes().contains(&SEPARATOR) {
        return Err(WalKvError::InvalidRecord(format!(
            "{} contains the record separator (newline)",
            name
        )));
    }
    Ok(())
}
