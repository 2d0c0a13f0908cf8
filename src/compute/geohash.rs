//! Geohash cell utilities.
//!
//! Cells are plain `String`s over the 32-symbol geohash alphabet; a cell's
//! length is its precision. Encoding and decoding go through the `geohash`
//! crate, the subdivision helpers here only ever append or strip symbols.

use crate::error::{GeohashTreeError, Result};
use geo::Point;
use geohash_tree_types::BoundingBox;
use rustc_hash::FxHashSet;

/// The geohash alphabet in canonical order.
pub const BASE32: &[u8; 32] = b"0123456789bcdefghjkmnpqrstuvwxyz";

/// Longest cell the `geohash` crate will encode.
pub const MAX_GEOHASH_PRECISION: usize = 12;

/// Encode a longitude/latitude point as a cell of the given precision.
///
/// # Examples
///
/// ```
/// use geohash_tree::compute::geohash::encode;
/// use geo::Point;
///
/// let cell = encode(&Point::new(-5.6, 42.6), 5).unwrap();
/// assert_eq!(cell, "ezs42");
/// ```
pub fn encode(point: &Point, precision: usize) -> Result<String> {
    let coord = geohash::Coord {
        x: point.x(),
        y: point.y(),
    };
    Ok(geohash::encode(coord, precision)?)
}

/// Decode a cell into the rectangle it covers.
pub fn cell_bbox(cell: &str) -> Result<BoundingBox> {
    Ok(geohash::decode_bbox(cell)?.into())
}

/// Center point of a cell.
pub fn middle(cell: &str) -> Result<Point> {
    Ok(cell_bbox(cell)?.center())
}

/// The 32 cells one precision level below `cell`, in alphabet order.
pub fn children(cell: &str) -> Vec<String> {
    BASE32
        .iter()
        .map(|&symbol| {
            let mut child = String::with_capacity(cell.len() + 1);
            child.push_str(cell);
            child.push(symbol as char);
            child
        })
        .collect()
}

/// The cell one precision level above `cell`, or `None` for an empty cell.
pub fn parent(cell: &str) -> Option<&str> {
    if cell.is_empty() {
        None
    } else {
        Some(&cell[..cell.len() - 1])
    }
}

/// Cover `bbox` with cells of `precision`.
///
/// The four corner cells are always included. The rest of the box is sampled
/// on a grid whose step is the size of the north-east corner cell, so every
/// column and row of cells the box touches is visited at least once. Sample
/// points are clamped into `bbox`, which keeps them inside the valid
/// coordinate range and makes zero-area boxes yield a single cell.
///
/// The result is sorted.
pub fn starting_cells(bbox: &BoundingBox, precision: usize) -> Result<Vec<String>> {
    let mut cells = FxHashSet::default();
    for corner in bbox.corners() {
        cells.insert(encode(&corner, precision)?);
    }

    let reference = cell_bbox(&encode(&Point::new(bbox.east, bbox.north), precision)?)?;
    let (dx, dy) = (reference.width(), reference.height());
    if dx <= 0.0 || dy <= 0.0 {
        return Err(GeohashTreeError::Geohash(format!(
            "cell at precision {} has no extent",
            precision
        )));
    }

    let mut x = bbox.west;
    while x < reference.east {
        let mut y = bbox.south;
        while y < reference.north {
            let sample = Point::new(x.min(bbox.east), y.min(bbox.north));
            cells.insert(encode(&sample, precision)?);
            y += dy;
        }
        x += dx;
    }

    let mut cells: Vec<String> = cells.into_iter().collect();
    cells.sort_unstable();
    Ok(cells)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_known_cell() {
        assert_eq!(encode(&Point::new(-5.6, 42.6), 5).unwrap(), "ezs42");
        assert_eq!(encode(&Point::new(-5.6, 42.6), 1).unwrap(), "e");
    }

    #[test]
    fn test_encode_rejects_out_of_range() {
        assert!(encode(&Point::new(181.0, 0.0), 5).is_err());
        assert!(encode(&Point::new(0.0, -91.0), 5).is_err());
    }

    #[test]
    fn test_decoded_box_contains_point() {
        let point = Point::new(-104.99, 39.74);
        for precision in 1..=9 {
            let cell = encode(&point, precision).unwrap();
            assert!(cell_bbox(&cell).unwrap().contains_point(&point));
        }
    }

    #[test]
    fn test_increasing_precision_nests_boxes() {
        let point = Point::new(151.2, -33.86);
        let mut previous = cell_bbox(&encode(&point, 1).unwrap()).unwrap();
        for precision in 2..=8 {
            let current = cell_bbox(&encode(&point, precision).unwrap()).unwrap();
            assert!(previous.contains_bbox(&current));
            assert!(current.width() * current.height() < previous.width() * previous.height());
            previous = current;
        }
    }

    #[test]
    fn test_children_tile_parent() {
        for cell in ["9", "s0", "ezs4"] {
            let parent_box = cell_bbox(cell).unwrap();
            let kids = children(cell);
            assert_eq!(kids.len(), 32);

            let mut area = 0.0;
            for (i, kid) in kids.iter().enumerate() {
                assert_eq!(parent(kid), Some(cell));
                let kid_box = cell_bbox(kid).unwrap();
                assert!(parent_box.contains_bbox(&kid_box));
                area += kid_box.width() * kid_box.height();

                for other in &kids[i + 1..] {
                    let other_box = cell_bbox(other).unwrap();
                    let overlap_w = kid_box.east.min(other_box.east) - kid_box.west.max(other_box.west);
                    let overlap_h =
                        kid_box.north.min(other_box.north) - kid_box.south.max(other_box.south);
                    assert!(overlap_w <= 1e-12 || overlap_h <= 1e-12);
                }
            }

            let parent_area = parent_box.width() * parent_box.height();
            assert!((area - parent_area).abs() < parent_area * 1e-9);
        }
    }

    #[test]
    fn test_children_follow_alphabet_order() {
        let kids = children("u");
        assert_eq!(kids.first().map(String::as_str), Some("u0"));
        assert_eq!(kids.last().map(String::as_str), Some("uz"));
        assert_eq!(parent(""), None);
    }

    #[test]
    fn test_starting_cells_around_origin() {
        let bbox = BoundingBox::new(-1.0, 1.0, 1.0, -1.0);
        let cells = starting_cells(&bbox, 1).unwrap();
        assert_eq!(cells, vec!["7", "e", "k", "s"]);
    }

    #[test]
    fn test_starting_cells_cover_box() {
        let bbox = BoundingBox::new(-109.05, -102.04, 41.0, 36.99);
        let precision = 3;
        let cells = starting_cells(&bbox, precision).unwrap();

        for i in 0..=40 {
            for j in 0..=40 {
                let x = bbox.west + bbox.width() * i as f64 / 40.0;
                let y = bbox.south + bbox.height() * j as f64 / 40.0;
                let cell = encode(&Point::new(x, y), precision).unwrap();
                assert!(cells.contains(&cell), "{} not covered", cell);
            }
        }
    }

    #[test]
    fn test_starting_cells_zero_area_box() {
        let bbox = BoundingBox::new(10.0, 10.0, 20.0, 20.0);
        let cells = starting_cells(&bbox, 6).unwrap();
        assert_eq!(cells.len(), 1);
    }

    #[test]
    fn test_middle_is_inside_cell() {
        let center = middle("9xj").unwrap();
        assert!(cell_bbox("9xj").unwrap().contains_point(&center));
    }
}
