//! Storage backend abstraction for geohash-tree
//!
//! An index is a flat, immutable `cell -> value` map. Backends are loaded once
//! through [`BulkPut`] (or opened from disk) and are read-only afterwards, so
//! concurrent lookups need no locking.

use crate::error::Result;
use geohash_tree_types::IndexRecord;

mod disk;
mod memory;

pub use disk::{DiskBackend, DiskBackendBuilder, create_disk_index};
pub use memory::MemoryBackend;

/// Trait for read-only index backends
pub trait StorageBackend: Send + Sync {
    /// Get the value stored under an exact key
    fn get(&self, key: &str) -> Result<Option<&str>>;

    /// Get the total number of keys
    fn len(&self) -> usize;

    /// Check if the storage is empty
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get storage statistics
    fn stats(&self) -> StorageStats;
}

/// Write path for loading records into a backend.
///
/// Later records overwrite earlier ones with the same key.
pub trait BulkPut {
    /// Insert every record, returning how many were consumed.
    fn bulk_put<I>(&mut self, records: I) -> Result<usize>
    where
        I: IntoIterator<Item = IndexRecord>;
}

/// Storage backend statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StorageStats {
    /// Total number of keys
    pub key_count: usize,
    /// Storage size in bytes (approximate)
    pub size_bytes: usize,
}
