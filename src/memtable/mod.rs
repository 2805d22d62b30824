//! MemTable Module
//!
//! In-memory mapping derived from the log.
//!
//! ## Responsibilities
//! - Fast reads and writes in memory
//! - Last-write-wins folding of replayed records
//!
//! ## Data Structure Choice
//! Using HashMap: keys are unique, iteration order is irrelevant and the
//! table is never flushed in key order.

mod table;

pub use table::{Iter, MemTable, ReplayStats};
