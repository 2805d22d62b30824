//! Store Module
//!
//! The keyed store that coordinates the log and the in-memory table.
//!
//! ## Responsibilities
//! - Append every mutation to the log before it becomes visible
//! - Rebuild the table by replaying a log after restart or crash
//! - Offer a serialized handle for callers on several threads
//!
//! ## Lifecycle
//! ```text
//!   new / create / recreate        close(self)
//! ─────────────────────────> Ready ───────────> Closed
//!                             │ ▲
//!                             └─┘ get / put
//! ```

mod kv_store;
mod shared;

pub use kv_store::KvStore;
pub use shared::SharedKvStore;
