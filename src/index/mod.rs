//! Serialized index: compaction of leaf cells and the textual record format.
//!
//! Both the textual format and the storage backends keep the index header as
//! ordinary records next to the cell records. `dummy` is itself a valid
//! geohash, so a cell record may replace the header line of that name; only
//! `min` and `max` are ever read back.
//!
//! ```text
//! GEOHASH,ID
//! min,<min precision>
//! max,<max precision>
//! dummy,-1
//! <cell>,<polygon id or -1>
//! ```

pub mod compact;
pub mod csv;

use crate::compute::validation::validate_precision;
use crate::error::{GeohashTreeError, Result};
use geohash_tree_types::{IndexRecord, SENTINEL};

pub const HEADER_KEY: &str = "GEOHASH";
pub const HEADER_VALUE: &str = "ID";
pub const MIN_KEY: &str = "min";
pub const MAX_KEY: &str = "max";
pub const SENTINEL_KEY: &str = "dummy";

/// Precision bounds of a serialized index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexHeader {
    pub min_precision: usize,
    pub max_precision: usize,
}

impl IndexHeader {
    pub fn new(min_precision: usize, max_precision: usize) -> Self {
        Self {
            min_precision,
            max_precision,
        }
    }

    /// The header as records, in file order.
    pub fn to_records(&self) -> Vec<IndexRecord> {
        vec![
            IndexRecord::new(HEADER_KEY, HEADER_VALUE),
            IndexRecord::new(MIN_KEY, self.min_precision.to_string()),
            IndexRecord::new(MAX_KEY, self.max_precision.to_string()),
            IndexRecord::new(SENTINEL_KEY, SENTINEL),
        ]
    }

    /// Read the header back through a key lookup.
    ///
    /// `min` and `max` must be present and numeric. The `dummy` entry is not
    /// consulted: the sentinel is always [`SENTINEL`].
    pub fn from_lookup<'a, F>(mut lookup: F) -> Result<Self>
    where
        F: FnMut(&str) -> Result<Option<&'a str>>,
    {
        let min_precision = parse_precision(MIN_KEY, lookup(MIN_KEY)?)?;
        let max_precision = parse_precision(MAX_KEY, lookup(MAX_KEY)?)?;
        validate_precision(min_precision, max_precision).map_err(|e| {
            GeohashTreeError::MalformedIndex(format!("Header precision bounds: {}", e))
        })?;

        Ok(Self {
            min_precision,
            max_precision,
        })
    }
}

fn parse_precision(key: &str, value: Option<&str>) -> Result<usize> {
    let value = value.ok_or_else(|| {
        GeohashTreeError::MalformedIndex(format!("Header field '{}' is missing", key))
    })?;
    value.trim().parse::<usize>().map_err(|_| {
        GeohashTreeError::MalformedIndex(format!(
            "Header field '{}' is not a number: '{}'",
            key, value
        ))
    })
}
