//! Error types for walkv
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

/// Result type alias using WalKvError
pub type Result<T> = std::result::Result<T, WalKvError>;

/// Unified error type for walkv operations
#[derive(Debug, Error)]
pub enum WalKvError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    /// Open, create, write, sync or read failure on the log file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // WAL Errors
    // -------------------------------------------------------------------------
    /// Key or value would break newline framing
    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    /// A complete record whose bytes are not valid UTF-8
    #[error("WAL corruption detected: {0}")]
    WalCorruption(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl WalKvError {
    /// The underlying I/O error kind, if this is an I/O failure
    pub fn io_kind(&self) -> Option<std::io::ErrorKind> {
        match self {
            WalKvError::Io(e) => Some(e.kind()),
            _ => None,
        }
    }
}
