//! Write-Ahead Log (WAL) Module
//!
//! Provides durability guarantees through append-only logging.
//!
//! ## Responsibilities
//! - Append a record and fsync it before any mutation becomes visible
//! - Sequential, forward-only replay from an explicit cursor
//! - Treat an unterminated trailing fragment as end-of-log
//!
//! ## File Format
//! ```text
//! ┌──────────────────────────────┐
//! │ Record 1                     │
//! │ ┌───────────┬──────────────┐ │
//! │ │ key  '\n' │ value  '\n'  │ │
//! │ └───────────┴──────────────┘ │
//! ├──────────────────────────────┤
//! │ Record 2                     │
//! │ ┌───────────┬──────────────┐ │
//! │ │ key  '\n' │ value  '\n'  │ │
//! │ └───────────┴──────────────┘ │
//! └──────────────────────────────┘
//! ```
//!
//! No header, checksum or length prefix. Keys and values must not contain
//! a newline.

mod cursor;
mod log;
mod record;

pub use cursor::ReplayCursor;
pub use log::{AppendLog, Records};
pub use record::{Record, SEPARATOR};
