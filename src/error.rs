//! Error types for geohash-tree.

use std::io;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, GeohashTreeError>;

#[derive(Debug, Error)]
pub enum GeohashTreeError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Malformed index: {0}")]
    MalformedIndex(String),

    #[error("Invalid precision bounds: min {min}, max {max} (expected 1 <= min <= max <= 12)")]
    InvalidPrecision { min: usize, max: usize },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Degenerate geometry: {0}")]
    DegenerateGeometry(String),

    #[error("Geohash error: {0}")]
    Geohash(String),

    #[error("GeoJSON error: {0}")]
    GeoJson(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<geohash::GeohashError> for GeohashTreeError {
    fn from(err: geohash::GeohashError) -> Self {
        GeohashTreeError::Geohash(err.to_string())
    }
}

impl From<geojson::Error> for GeohashTreeError {
    fn from(err: geojson::Error) -> Self {
        GeohashTreeError::GeoJson(err.to_string())
    }
}
