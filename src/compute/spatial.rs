//! Polygon geometry: bounding boxes and ray-casting membership.
//!
//! Polygons are `geo::Polygon`s. The exterior ring and every interior ring
//! are treated alike; holes fall out of the even-odd crossing count.

use geo::{Coord, LineString, Point, Polygon};
use geohash_tree_types::BoundingBox;
use rand::Rng;

/// Iterate the exterior ring followed by the interior rings.
pub fn rings(polygon: &Polygon) -> impl Iterator<Item = &LineString> {
    std::iter::once(polygon.exterior()).chain(polygon.interiors())
}

/// Edges of a ring, including the implicit edge from the last vertex back to the first.
fn ring_edges(ring: &LineString) -> impl Iterator<Item = (Coord, Coord)> + '_ {
    let coords = &ring.0;
    (0..coords.len()).map(move |i| (coords[i], coords[(i + 1) % coords.len()]))
}

/// Bounding box over the vertices of every ring, or `None` for an empty polygon.
pub fn polygon_bbox(polygon: &Polygon) -> Option<BoundingBox> {
    let mut coords = rings(polygon).flat_map(|ring| ring.coords());
    let first = coords.next()?;
    let init = BoundingBox::new(first.x, first.x, first.y, first.y);

    Some(coords.fold(init, |bbox, c| {
        BoundingBox::new(
            bbox.west.min(c.x),
            bbox.east.max(c.x),
            bbox.north.max(c.y),
            bbox.south.min(c.y),
        )
    }))
}

/// Even-odd point-in-polygon test casting a ray towards increasing x.
///
/// An edge owns its lower endpoint but not its upper one, so a ray passing
/// exactly through a shared vertex is counted once. Horizontal edges never
/// count.
///
/// # Examples
///
/// ```
/// use geohash_tree::compute::spatial::point_in_polygon;
/// use geo::{Point, polygon};
///
/// let square = polygon![
///     (x: -1.0, y: -1.0),
///     (x: 1.0, y: -1.0),
///     (x: 1.0, y: 1.0),
///     (x: -1.0, y: 1.0),
/// ];
/// assert!(point_in_polygon(&square, &Point::new(0.0, 0.0)));
/// assert!(!point_in_polygon(&square, &Point::new(2.0, 2.0)));
/// ```
pub fn point_in_polygon(polygon: &Polygon, point: &Point) -> bool {
    let (px, py) = (point.x(), point.y());
    let mut crossings = 0usize;

    for ring in rings(polygon) {
        for (curr, next) in ring_edges(ring) {
            let (bottom, top) = if curr.y > next.y {
                (next, curr)
            } else {
                (curr, next)
            };
            if py < bottom.y || py >= top.y {
                continue;
            }

            if px >= curr.x.max(next.x) || next.y == curr.y {
                continue;
            }

            let x_intercept = (py - curr.y) * (next.x - curr.x) / (next.y - curr.y) + curr.x;
            if curr.x != next.x && px > x_intercept {
                continue;
            }

            crossings += 1;
        }
    }

    crossings % 2 == 1
}

/// Uniformly distributed point inside `bounds`.
pub fn random_point<R: Rng + ?Sized>(bounds: &BoundingBox, rng: &mut R) -> Point {
    Point::new(
        bounds.west + rng.random::<f64>() * bounds.width(),
        bounds.south + rng.random::<f64>() * bounds.height(),
    )
}
