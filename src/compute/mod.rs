//! The index-building core: cell utilities, geometry, classification and
//! subdivision, plus the GeoJSON polygon source and input validation.

pub mod classify;
pub mod drill;
pub mod geohash;
pub mod geojson;
pub mod spatial;
pub mod validation;
