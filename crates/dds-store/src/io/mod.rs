//! Snapshot file I/O.
//!
//! Each key is stored as a JSON document:
//!
//! ```text
//! { "schema_version": 1, "items": [ ... ] }
//! ```

mod load;
mod save;

pub use load::{LoadWarning, Snapshot, read_snapshot};
pub use save::write_snapshot;

/// Version written by this build; newer snapshots are refused.
pub const CURRENT_SCHEMA_VERSION: u32 = 1;
