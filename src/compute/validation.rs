//! Validation for coordinates, polygons and precision bounds.

use crate::compute::geohash::MAX_GEOHASH_PRECISION;
use crate::compute::spatial::{polygon_bbox, rings};
use crate::error::{GeohashTreeError, Result};
use geo::{Point, Polygon};
use geohash_tree_types::BoundingBox;

/// Validates a point has a finite longitude in [-180, 180] and latitude in [-90, 90].
///
/// # Examples
///
/// ```
/// use geohash_tree::compute::validation::validate_geographic_point;
/// use geo::Point;
///
/// assert!(validate_geographic_point(&Point::new(-74.0060, 40.7128)).is_ok());
/// assert!(validate_geographic_point(&Point::new(200.0, 40.0)).is_err());
/// assert!(validate_geographic_point(&Point::new(-74.0, 95.0)).is_err());
/// ```
pub fn validate_geographic_point(point: &Point) -> Result<()> {
    let (x, y) = (point.x(), point.y());

    if !x.is_finite() || !y.is_finite() {
        return Err(GeohashTreeError::InvalidInput(format!(
            "Coordinates must be finite, got: ({}, {})",
            x, y
        )));
    }

    if !(-180.0..=180.0).contains(&x) {
        return Err(GeohashTreeError::InvalidInput(format!(
            "Longitude out of range [-180.0, 180.0]: {}",
            x
        )));
    }

    if !(-90.0..=90.0).contains(&y) {
        return Err(GeohashTreeError::InvalidInput(format!(
            "Latitude out of range [-90.0, 90.0]: {}",
            y
        )));
    }

    Ok(())
}

/// Validates precision bounds: `1 <= min <= max <= 12`.
pub fn validate_precision(min_precision: usize, max_precision: usize) -> Result<()> {
    if min_precision == 0 || min_precision > max_precision || max_precision > MAX_GEOHASH_PRECISION
    {
        return Err(GeohashTreeError::InvalidPrecision {
            min: min_precision,
            max: max_precision,
        });
    }
    Ok(())
}

/// Validates a polygon can be indexed and returns its bounding box.
///
/// Rejects polygons with out-of-range coordinates, fewer than three distinct
/// exterior vertices, a zero-width or zero-height bounding box, or an edge
/// spanning more than 180 degrees of longitude (taken as crossing the
/// antimeridian, which the cell cover cannot represent).
pub fn validate_polygon(polygon: &Polygon) -> Result<BoundingBox> {
    for (ring_idx, ring) in rings(polygon).enumerate() {
        for (idx, coord) in ring.coords().enumerate() {
            validate_geographic_point(&Point::from(*coord)).map_err(|e| {
                GeohashTreeError::InvalidInput(format!(
                    "Ring {} point at index {}: {}",
                    ring_idx, idx, e
                ))
            })?;
        }

        if let Some(edge) = ring.lines().find(|line| (line.end.x - line.start.x).abs() > 180.0) {
            return Err(GeohashTreeError::DegenerateGeometry(format!(
                "Ring {} edge from ({}, {}) to ({}, {}) crosses the antimeridian",
                ring_idx, edge.start.x, edge.start.y, edge.end.x, edge.end.y
            )));
        }
    }

    let mut distinct: Vec<_> = polygon.exterior().coords().collect();
    distinct.dedup();
    if distinct.len() > 1 && distinct.first() == distinct.last() {
        distinct.pop();
    }
    if distinct.len() < 3 {
        return Err(GeohashTreeError::DegenerateGeometry(format!(
            "Exterior ring needs at least 3 distinct vertices, got {}",
            distinct.len()
        )));
    }

    let bbox = polygon_bbox(polygon)
        .ok_or_else(|| GeohashTreeError::DegenerateGeometry("Polygon has no vertices".into()))?;
    if bbox.is_degenerate() {
        return Err(GeohashTreeError::DegenerateGeometry(format!(
            "Bounding box has zero area: {:?}",
            bbox
        )));
    }

    Ok(bbox)
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::polygon;

    #[test]
    fn test_precision_bounds() {
        assert!(validate_precision(1, 3).is_ok());
        assert!(validate_precision(5, 5).is_ok());
        assert!(validate_precision(0, 3).is_err());
        assert!(validate_precision(4, 3).is_err());
        assert!(validate_precision(3, 13).is_err());
    }

    #[test]
    fn test_valid_polygon_returns_bbox() {
        let poly = polygon![
            (x: -80.0, y: 35.0),
            (x: -70.0, y: 35.0),
            (x: -70.0, y: 45.0),
            (x: -80.0, y: 45.0),
        ];
        let bbox = validate_polygon(&poly).unwrap();
        assert_eq!(bbox, BoundingBox::new(-80.0, -70.0, 45.0, 35.0));
    }

    #[test]
    fn test_out_of_range_polygon() {
        let poly = polygon![
            (x: -80.0, y: 35.0),
            (x: -70.0, y: 95.0),
            (x: -80.0, y: 45.0),
        ];
        assert!(matches!(
            validate_polygon(&poly),
            Err(GeohashTreeError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_zero_area_polygon() {
        let line = polygon![
            (x: 0.0, y: 0.0),
            (x: 5.0, y: 0.0),
            (x: 10.0, y: 0.0),
        ];
        assert!(matches!(
            validate_polygon(&line),
            Err(GeohashTreeError::DegenerateGeometry(_))
        ));

        let point = polygon![(x: 1.0, y: 1.0), (x: 1.0, y: 1.0), (x: 1.0, y: 1.0)];
        assert!(matches!(
            validate_polygon(&point),
            Err(GeohashTreeError::DegenerateGeometry(_))
        ));
    }

    #[test]
    fn test_antimeridian_polygon() {
        let fiji = polygon![
            (x: 177.0, y: -16.0),
            (x: -179.0, y: -16.0),
            (x: -179.0, y: -18.0),
            (x: 177.0, y: -18.0),
        ];
        assert!(matches!(
            validate_polygon(&fiji),
            Err(GeohashTreeError::DegenerateGeometry(_))
        ));
    }
}
