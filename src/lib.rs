//! Geohash prefix-tree index for point-in-polygon lookups.
//!
//! Polygons are covered offline by geohash cells of varying precision; each
//! accepted cell and its ancestors become `cell -> id` records. A query then
//! resolves a point with one exact-key lookup per precision level.
//!
//! ```rust
//! use geohash_tree::prelude::*;
//! use geohash_tree::compute::drill::make_polygon_index;
//! use geohash_tree::index::compact::compact;
//! use geo::polygon;
//!
//! let square = polygon![
//!     (x: -1.0, y: -1.0),
//!     (x: 1.0, y: -1.0),
//!     (x: 1.0, y: 1.0),
//!     (x: -1.0, y: 1.0),
//! ];
//! let leaves = make_polygon_index(square, 1, 3)?;
//! let records = compact(&leaves, "P1", 1);
//!
//! let backend = MemoryBackend::from_records(&IndexHeader::new(1, 3), records)?;
//! let tree = GeohashTree::open(Box::new(backend))?;
//! assert_eq!(tree.query(&Point::new(0.0, 0.0))?, Some("P1"));
//! assert_eq!(tree.query(&Point::new(50.0, 50.0))?, None);
//! # Ok::<(), geohash_tree::GeohashTreeError>(())
//! ```

pub mod builder;
pub mod compute;
pub mod config;
pub mod error;
pub mod index;
pub mod ingest;
pub mod storage;
pub mod tree;

pub use builder::{BackendKind, TreeBuilder};
pub use config::IndexConfig;
pub use error::{GeohashTreeError, Result};
pub use tree::GeohashTree;

pub use geo::{Point, Polygon};
pub use geohash_tree_types::{BoundingBox, IndexRecord, SENTINEL};

pub use compute::drill::make_polygon_index;
pub use index::IndexHeader;
pub use index::compact::compact;
pub use ingest::{IndexWriter, IngestStats, index_from_geojson};

pub use storage::{
    BulkPut, DiskBackend, DiskBackendBuilder, MemoryBackend, StorageBackend, StorageStats,
    create_disk_index,
};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common imports
pub mod prelude {

    pub use crate::{GeohashTree, GeohashTreeError, IndexConfig, Result, TreeBuilder};

    pub use geo::{Point, Polygon};

    pub use crate::{BoundingBox, IndexHeader, IndexRecord};

    pub use crate::{BulkPut, DiskBackend, MemoryBackend, StorageBackend};
}
