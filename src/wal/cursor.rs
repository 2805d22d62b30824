//! Replay cursor
//!
//! The read position is a plain value kept apart from the append position,
//! which is always the physical end of the file.

/// Position of the next unread record in a log
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplayCursor {
    offset: u64,
    records: u64,
}

impl ReplayCursor {
    /// Cursor at the first byte of the log
    pub fn start() -> Self {
        Self::default()
    }

    /// Byte offset of the next record
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Complete records consumed before this position
    pub fn records(&self) -> u64 {
        self.records
    }

    pub(crate) fn advance(&mut self, bytes: u64) {
        self.offset += bytes;
        self.records += 1;
    }
}
