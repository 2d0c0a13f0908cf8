//! Query side of an index: resolve points to polygon ids.

use crate::compute::geohash::encode;
use crate::compute::validation::validate_geographic_point;
use crate::error::Result;
use crate::index::IndexHeader;
use crate::storage::{DiskBackend, MemoryBackend, StorageBackend, StorageStats};
use geo::Point;
use geohash_tree_types::SENTINEL;
use log::{debug, info};
use std::path::Path;

/// A loaded index together with the precision bounds from its header.
///
/// Read-only once opened; share it between threads behind an `Arc` to run
/// queries concurrently.
pub struct GeohashTree {
    backend: Box<dyn StorageBackend>,
    min_precision: usize,
    max_precision: usize,
}

impl GeohashTree {
    /// Open an index held by any backend, reading `min`, `max` and `dummy`
    /// from the backend itself.
    pub fn open(backend: Box<dyn StorageBackend>) -> Result<Self> {
        let header = IndexHeader::from_lookup(|key| backend.get(key))?;
        info!(
            "Opened index: precision {}..={}, {} keys",
            header.min_precision,
            header.max_precision,
            backend.len()
        );
        Ok(Self {
            backend,
            min_precision: header.min_precision,
            max_precision: header.max_precision,
        })
    }

    /// Load a textual index into memory.
    pub fn open_csv<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open(Box::new(MemoryBackend::from_csv(path)?))
    }

    /// Open a table file written by [`crate::storage::DiskBackendBuilder`].
    pub fn open_disk<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open(Box::new(DiskBackend::open(path)?))
    }

    /// Id of the polygon containing `point`, if any.
    ///
    /// Looks up the point's prefixes from `min_precision` upwards and stops at
    /// the first miss or the first non-sentinel value, so at most
    /// `max_precision - min_precision + 1` keys are read.
    pub fn query(&self, point: &Point) -> Result<Option<&str>> {
        validate_geographic_point(point)?;
        let ghash = encode(point, self.max_precision)?;

        for precision in self.min_precision..=self.max_precision {
            let prefix = &ghash[..precision];
            match self.backend.get(prefix)? {
                None => {
                    debug!("No record for prefix {}", prefix);
                    return Ok(None);
                }
                Some(value) if value != SENTINEL => return Ok(Some(value)),
                Some(_) => {}
            }
        }
        Ok(None)
    }

    /// Exact-key lookup, header keys included.
    pub fn get(&self, key: &str) -> Result<Option<&str>> {
        self.backend.get(key)
    }

    pub fn min_precision(&self) -> usize {
        self.min_precision
    }

    pub fn max_precision(&self) -> usize {
        self.max_precision
    }

    pub fn stats(&self) -> StorageStats {
        self.backend.stats()
    }
}

impl std::fmt::Debug for GeohashTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeohashTree")
            .field("min_precision", &self.min_precision)
            .field("max_precision", &self.max_precision)
            .field("keys", &self.backend.len())
            .finish()
    }
}
