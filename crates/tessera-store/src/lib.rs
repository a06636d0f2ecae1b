//! Versioned, capacity-bounded snapshot history keyed by source URL

mod backend;
mod error;
mod snapshot;
mod store;

pub use backend::{JsonFileBackend, MemoryBackend, SqliteBackend, StorageBackend};
pub use error::StorageError;
pub use snapshot::{Capture, Snapshot, SnapshotFormat};
pub use store::{SnapshotStore, StoreStats};
