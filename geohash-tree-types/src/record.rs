use serde::{Deserialize, Serialize};

/// Value stored for a prefix that has indexed descendants but is not itself
/// a polygon match.
pub const SENTINEL: &str = "-1";

/// One `cell -> value` entry of a serialized index.
///
/// `value` is either a polygon identifier or [`SENTINEL`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct IndexRecord {
    pub cell: String,
    pub value: String,
}

impl IndexRecord {
    pub fn new(cell: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            cell: cell.into(),
            value: value.into(),
        }
    }

    /// A record marking `cell` as an interior prefix node.
    pub fn sentinel(cell: impl Into<String>) -> Self {
        Self::new(cell, SENTINEL)
    }

    pub fn is_sentinel(&self) -> bool {
        self.value == SENTINEL
    }
}
