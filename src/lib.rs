//! # walkv
//!
//! A durable single-node key-value store with:
//! - An append-only log, fsynced before every write becomes visible
//! - Crash recovery by replaying the log, dropping an interrupted tail
//! - Single-owner store plus a mutex-serialized shared handle
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                 KvStore                     │
//! │        (SharedKvStore for threads)          │
//! └─────────────────────┬───────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │ 1. append + fsync       │ 2. insert
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │  AppendLog  │ ───────► │  MemTable   │
//!   │  (file)     │  replay  │  (HashMap)  │
//!   └─────────────┘          └─────────────┘
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use walkv::KvStore;
//!
//! # fn main() -> walkv::Result<()> {
//! let mut store = KvStore::new("./data")?;
//! store.put("yo", "hi")?;
//! let path = store.log_path().to_path_buf();
//! drop(store);
//!
//! let store = KvStore::recreate(&path)?;
//! assert_eq!(store.get("yo"), Some("hi"));
//! # Ok(())
//! # }
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod wal;
pub mod memtable;
pub mod store;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{WalKvError, Result};
pub use config::Config;
pub use store::{KvStore, SharedKvStore};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of walkv
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
