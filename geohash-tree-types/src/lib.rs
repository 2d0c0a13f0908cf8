//! # geohash-tree-types
//!
//! Plain data types shared by the geohash-tree index builder, its storage
//! backends and its callers.
//!
//! - **Bounding boxes**: `BoundingBox`, a west/east/north/south rectangle in degrees
//! - **Index records**: `IndexRecord`, one `cell -> value` line of a serialized index
//!
//! All types are serializable with Serde and convert to and from the `geo`
//! crate's primitives.
//!
//! ## Examples
//!
//! ```rust
//! use geohash_tree_types::bbox::BoundingBox;
//! use geo::Point;
//!
//! let colorado = BoundingBox::new(-109.05, -102.04, 41.0, 36.99);
//! assert!(colorado.contains_point(&Point::new(-104.99, 39.74)));
//! ```

pub mod bbox;
pub mod record;

pub use bbox::BoundingBox;
pub use record::{IndexRecord, SENTINEL};
