use geo::{Point, Rect, coord};
use serde::{Deserialize, Serialize};

/// A longitude/latitude aligned bounding box in signed degrees.
///
/// Boxes never wrap the antimeridian: `west <= east` and `south <= north`
/// for every box produced by this crate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub west: f64,
    pub east: f64,
    pub north: f64,
    pub south: f64,
}

impl BoundingBox {
    /// Create a bounding box from its four edges.
    ///
    /// # Examples
    ///
    /// ```
    /// use geohash_tree_types::bbox::BoundingBox;
    ///
    /// let bbox = BoundingBox::new(-1.0, 1.0, 1.0, -1.0);
    /// assert_eq!(bbox.width(), 2.0);
    /// ```
    pub fn new(west: f64, east: f64, north: f64, south: f64) -> Self {
        Self {
            west,
            east,
            north,
            south,
        }
    }

    /// Get the width in degrees of longitude.
    pub fn width(&self) -> f64 {
        self.east - self.west
    }

    /// Get the height in degrees of latitude.
    pub fn height(&self) -> f64 {
        self.north - self.south
    }

    /// Get the center point of the bounding box.
    pub fn center(&self) -> Point {
        Point::new(
            (self.west + self.east) / 2.0,
            (self.south + self.north) / 2.0,
        )
    }

    /// The four corners in west-north, east-north, east-south, west-south order.
    pub fn corners(&self) -> [Point; 4] {
        [
            Point::new(self.west, self.north),
            Point::new(self.east, self.north),
            Point::new(self.east, self.south),
            Point::new(self.west, self.south),
        ]
    }

    /// Check if a point lies within the box, edges included.
    pub fn contains_point(&self, point: &Point) -> bool {
        point.x() >= self.west
            && point.x() <= self.east
            && point.y() >= self.south
            && point.y() <= self.north
    }

    /// Check if `other` lies entirely within this box, edges included.
    pub fn contains_bbox(&self, other: &BoundingBox) -> bool {
        other.west >= self.west
            && other.east <= self.east
            && other.south >= self.south
            && other.north <= self.north
    }

    /// A box is degenerate when it has no width or no height.
    pub fn is_degenerate(&self) -> bool {
        self.width() <= 0.0 || self.height() <= 0.0
    }
}

impl From<Rect> for BoundingBox {
    fn from(rect: Rect) -> Self {
        Self {
            west: rect.min().x,
            east: rect.max().x,
            north: rect.max().y,
            south: rect.min().y,
        }
    }
}

impl From<BoundingBox> for Rect {
    fn from(bbox: BoundingBox) -> Self {
        Rect::new(
            coord! { x: bbox.west, y: bbox.south },
            coord! { x: bbox.east, y: bbox.north },
        )
    }
}
