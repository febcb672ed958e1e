//! Key-value persistence for the message snapshot.
//!
//! The session never touches the filesystem directly; it is handed a
//! [`SnapshotStore`] and writes the serialized log through it.

mod file;
mod memory;

pub use file::FileSnapshotStore;
pub use memory::MemorySnapshotStore;

use crate::error::Result;

/// A key-value store holding serialized snapshots.
pub trait SnapshotStore: Send + Sync {
    /// Read the raw value under `key`; `Ok(None)` when nothing is stored.
    fn load(&self, key: &str) -> Result<Option<String>>;

    /// Overwrite the value under `key`.
    fn save(&self, key: &str, value: &str) -> Result<()>;
}
