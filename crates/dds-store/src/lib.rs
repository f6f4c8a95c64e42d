//! Persistence for Data Dashboard Studio.
//!
//! A [`Store`] owns every saved collection and writes each one as a
//! versioned JSON snapshot under its root directory.

pub mod dirty;
pub mod error;
pub mod io;
pub mod keys;
pub mod store;

pub use dirty::DirtyTracker;
pub use error::{Result, StoreError};
pub use io::{CURRENT_SCHEMA_VERSION, LoadWarning, Snapshot, read_snapshot, write_snapshot};
pub use store::{Removed, Store};
