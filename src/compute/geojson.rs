//! GeoJSON polygon source.
//!
//! Turns GeoJSON features into `(id, polygons)` pairs for indexing. Only
//! Polygon and MultiPolygon geometries are indexable.

use crate::error::{GeohashTreeError, Result};
use geo::{Coord, LineString, Polygon};
use geojson::{Feature, FeatureCollection, Geometry, PolygonType, Value};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// One indexable feature: its identifier and every polygon it is made of.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceFeature {
    pub id: String,
    pub polygons: Vec<Polygon>,
}

impl SourceFeature {
    /// Extract the id from the string property `id_field` and the polygons
    /// from the geometry.
    ///
    /// Fails for a missing or non-string id property, a missing geometry, or
    /// a geometry that is not a Polygon or MultiPolygon. Callers ingesting a
    /// collection skip such features.
    pub fn from_feature(feature: &Feature, id_field: &str) -> Result<Self> {
        let id = feature
            .property(id_field)
            .and_then(|value| value.as_str())
            .ok_or_else(|| {
                GeohashTreeError::GeoJson(format!(
                    "Feature has no string property '{}'",
                    id_field
                ))
            })?
            .to_string();

        let geometry = feature
            .geometry
            .as_ref()
            .ok_or_else(|| GeohashTreeError::GeoJson(format!("Feature '{}' has no geometry", id)))?;

        Ok(Self {
            polygons: geometry_polygons(geometry)?,
            id,
        })
    }
}

/// Polygons of a Polygon or MultiPolygon geometry.
pub fn geometry_polygons(geometry: &Geometry) -> Result<Vec<Polygon>> {
    match &geometry.value {
        Value::Polygon(rings) => Ok(vec![polygon_from_rings(rings)?]),
        Value::MultiPolygon(polygons) => polygons.iter().map(polygon_from_rings).collect(),
        other => {
            let kind = match other {
                Value::Point(_) => "Point",
                Value::MultiPoint(_) => "MultiPoint",
                Value::LineString(_) => "LineString",
                Value::MultiLineString(_) => "MultiLineString",
                _ => "GeometryCollection",
            };
            Err(GeohashTreeError::GeoJson(format!(
                "Unsupported geometry type: {}",
                kind
            )))
        }
    }
}

/// Build a polygon from GeoJSON rings; the first ring is the exterior.
pub fn polygon_from_rings(rings: &PolygonType) -> Result<Polygon> {
    let mut rings = rings.iter().map(|ring| ring_from_positions(ring));
    let exterior = rings.next().ok_or_else(|| {
        GeohashTreeError::InvalidInput("Polygon must have at least one ring".to_string())
    })??;
    let interiors = rings.collect::<Result<Vec<_>>>()?;

    Ok(Polygon::new(exterior, interiors))
}

fn ring_from_positions(ring: &[Vec<f64>]) -> Result<LineString> {
    ring.iter()
        .map(|position| {
            if position.len() < 2 {
                return Err(GeohashTreeError::InvalidInput(
                    "Coordinate must have at least 2 values".to_string(),
                ));
            }
            Ok(Coord {
                x: position[0],
                y: position[1],
            })
        })
        .collect::<Result<Vec<_>>>()
        .map(LineString::from)
}

/// Read a FeatureCollection from a file.
pub fn read_feature_collection<P: AsRef<Path>>(path: P) -> Result<FeatureCollection> {
    let reader = BufReader::new(File::open(path.as_ref())?);
    serde_json::from_reader(reader).map_err(|e| {
        GeohashTreeError::GeoJson(format!(
            "Failed to parse feature collection {}: {}",
            path.as_ref().display(),
            e
        ))
    })
}
