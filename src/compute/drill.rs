//! Recursive subdivision of a polygon into accepted geohash cells.
//!
//! Work fans out with rayon at two sites: one task per starting cell, and one
//! task per child at every level of the recursion. Tasks share nothing but the
//! read-only [`PolygonIndex`]; each returns its own leaf list and lists are
//! concatenated at the join.

use crate::compute::classify::{CellClass, PolygonIndex};
use crate::compute::geohash::{children, starting_cells};
use crate::error::Result;
use geo::Polygon;
use log::debug;
use rayon::prelude::*;

impl PolygonIndex {
    /// Cells of `min_precision` covering the polygon's bounding box.
    pub fn starting_cells(&self) -> Result<Vec<String>> {
        starting_cells(self.bbox(), self.min_precision())
    }

    /// Leaf cells accepted below (or at) `cell`.
    ///
    /// A cell at `min_precision` that is already inside is accepted whole.
    /// Otherwise each child is classified: inside children are accepted,
    /// boundary children are drilled further, outside children are dropped.
    /// A boundary cell at `max_precision` cannot be refined and is accepted as
    /// if it were inside.
    pub fn drill(&self, cell: &str) -> Result<Vec<String>> {
        if cell.len() == self.min_precision() {
            match self.classify(cell)? {
                CellClass::Inside => return Ok(vec![cell.to_string()]),
                CellClass::Boundary if cell.len() >= self.max_precision() => {
                    return Ok(vec![cell.to_string()]);
                }
                _ => {}
            }
        }

        if cell.len() >= self.max_precision() {
            return Ok(Vec::new());
        }

        let nested = children(cell)
            .into_par_iter()
            .map(|child| -> Result<Vec<String>> {
                match self.classify(&child)? {
                    CellClass::Inside => Ok(vec![child]),
                    CellClass::Boundary if child.len() >= self.max_precision() => Ok(vec![child]),
                    CellClass::Boundary => self.drill(&child),
                    CellClass::Outside => Ok(Vec::new()),
                }
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(nested.into_iter().flatten().collect())
    }

    /// Every leaf cell accepted for this polygon, sorted.
    pub fn leaf_cells(&self) -> Result<Vec<String>> {
        let starts = self.starting_cells()?;

        let nested = starts
            .par_iter()
            .map(|cell| self.drill(cell))
            .collect::<Result<Vec<_>>>()?;
        let mut leaves: Vec<String> = nested.into_iter().flatten().collect();
        leaves.sort_unstable();

        debug!(
            "Subdivided polygon over {:?}: {} starting cells, {} leaf cells",
            self.bbox(),
            starts.len(),
            leaves.len()
        );
        Ok(leaves)
    }
}

/// Leaf cells covering `polygon` between the two precisions.
///
/// # Examples
///
/// ```
/// use geohash_tree::compute::drill::make_polygon_index;
/// use geo::polygon;
///
/// let square = polygon![
///     (x: -1.0, y: -1.0),
///     (x: 1.0, y: -1.0),
///     (x: 1.0, y: 1.0),
///     (x: -1.0, y: 1.0),
/// ];
/// let leaves = make_polygon_index(square, 1, 3).unwrap();
/// assert!(leaves.iter().all(|cell| (1..=3).contains(&cell.len())));
/// ```
pub fn make_polygon_index(
    polygon: Polygon,
    min_precision: usize,
    max_precision: usize,
) -> Result<Vec<String>> {
    PolygonIndex::new(polygon, min_precision, max_precision)?.leaf_cells()
}
