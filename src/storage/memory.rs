//! In-memory storage backend implementation.

use super::{BulkPut, StorageBackend, StorageStats};
use crate::error::Result;
use crate::index::IndexHeader;
use crate::index::csv::RecordReader;
use geohash_tree_types::IndexRecord;
use log::info;
use rustc_hash::FxHashMap;
use std::path::Path;

/// In-memory storage backend using HashMap
#[derive(Debug, Default)]
pub struct MemoryBackend {
    data: FxHashMap<String, String>,
}

impl MemoryBackend {
    /// Create a new in-memory storage backend
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with initial capacity hint
    pub fn with_capacity(capacity: usize) -> Self {
        let mut backend = Self::new();
        backend.data.reserve(capacity);
        backend
    }

    /// Load every line of a textual index.
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut backend = Self::new();
        let loaded = backend.bulk_put_results(RecordReader::open(path.as_ref())?.into_records())?;
        info!(
            "Loaded {} records from {} into memory",
            loaded,
            path.as_ref().display()
        );
        Ok(backend)
    }

    /// Build a backend holding `header` followed by `records`.
    pub fn from_records<I>(header: &IndexHeader, records: I) -> Result<Self>
    where
        I: IntoIterator<Item = IndexRecord>,
    {
        let mut backend = Self::new();
        backend.bulk_put(header.to_records().into_iter().chain(records))?;
        Ok(backend)
    }

    fn bulk_put_results<I>(&mut self, records: I) -> Result<usize>
    where
        I: IntoIterator<Item = Result<IndexRecord>>,
    {
        let mut count = 0;
        for record in records {
            let record = record?;
            self.data.insert(record.cell, record.value);
            count += 1;
        }
        Ok(count)
    }
}

impl BulkPut for MemoryBackend {
    fn bulk_put<I>(&mut self, records: I) -> Result<usize>
    where
        I: IntoIterator<Item = IndexRecord>,
    {
        self.bulk_put_results(records.into_iter().map(Ok))
    }
}

impl StorageBackend for MemoryBackend {
    fn get(&self, key: &str) -> Result<Option<&str>> {
        Ok(self.data.get(key).map(String::as_str))
    }

    fn len(&self) -> usize {
        self.data.len()
    }

    fn stats(&self) -> StorageStats {
        StorageStats {
            key_count: self.data.len(),
            size_bytes: self.data.iter().map(|(k, v)| k.len() + v.len()).sum(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_backend_basic_operations() {
        let mut backend = MemoryBackend::new();
        assert!(backend.is_empty());

        let loaded = backend
            .bulk_put(vec![
                IndexRecord::sentinel("9x"),
                IndexRecord::new("9xj", "08013"),
            ])
            .unwrap();
        assert_eq!(loaded, 2);
        assert_eq!(backend.get("9xj").unwrap(), Some("08013"));
        assert_eq!(backend.get("9x").unwrap(), Some("-1"));
        assert_eq!(backend.get("9w").unwrap(), None);
    }

    #[test]
    fn test_later_write_wins() {
        let mut backend = MemoryBackend::with_capacity(4);
        backend
            .bulk_put(vec![IndexRecord::new("u4", "A"), IndexRecord::new("u4", "B")])
            .unwrap();
        assert_eq!(backend.get("u4").unwrap(), Some("B"));
        assert_eq!(backend.len(), 1);
    }

    #[test]
    fn test_from_records_includes_header() {
        let backend =
            MemoryBackend::from_records(&IndexHeader::new(2, 6), vec![IndexRecord::new("9x", "A")])
                .unwrap();
        assert_eq!(backend.get("min").unwrap(), Some("2"));
        assert_eq!(backend.get("max").unwrap(), Some("6"));
        assert_eq!(backend.get("dummy").unwrap(), Some("-1"));
        assert_eq!(backend.stats().key_count, 5);
    }
}
