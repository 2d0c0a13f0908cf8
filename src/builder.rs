//! Tree builder for choosing a backend
//!
//! Opens a serialized index into either the in-memory backend or the
//! persistent table backend.

use crate::error::{GeohashTreeError, Result};
use crate::storage::{DiskBackend, MemoryBackend, StorageBackend};
use crate::tree::GeohashTree;
use std::path::PathBuf;

/// Where index records live while the tree is being queried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackendKind {
    /// Load a textual index fully into memory.
    #[default]
    Memory,
    /// Map a table file written by `create_disk_index`.
    Disk,
}

/// Builder for opening a [`GeohashTree`].
#[derive(Debug, Default)]
pub struct TreeBuilder {
    path: Option<PathBuf>,
    backend: BackendKind,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the index file to open.
    pub fn path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn backend(mut self, backend: BackendKind) -> Self {
        self.backend = backend;
        self
    }

    /// Shorthand for `backend(BackendKind::Memory)`.
    pub fn in_memory(self) -> Self {
        self.backend(BackendKind::Memory)
    }

    /// Shorthand for `backend(BackendKind::Disk)`.
    pub fn on_disk(self) -> Self {
        self.backend(BackendKind::Disk)
    }

    /// Open the index file and read its header.
    pub fn build(self) -> Result<GeohashTree> {
        let path = self
            .path
            .ok_or_else(|| GeohashTreeError::InvalidInput("No index path given".to_string()))?;

        let backend: Box<dyn StorageBackend> = match self.backend {
            BackendKind::Memory => Box::new(MemoryBackend::from_csv(&path)?),
            BackendKind::Disk => Box::new(DiskBackend::open(&path)?),
        };
        GeohashTree::open(backend)
    }
}
