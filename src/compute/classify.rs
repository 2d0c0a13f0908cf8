//! Cell classification against a single polygon.

use crate::compute::geohash::{cell_bbox, encode};
use crate::compute::spatial::{point_in_polygon, rings};
use crate::compute::validation::{validate_polygon, validate_precision};
use crate::error::Result;
use geo::{Point, Polygon};
use geohash_tree_types::BoundingBox;
use rustc_hash::FxHashSet;

/// How a cell relates to a polygon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellClass {
    /// All four corners are inside the polygon.
    Inside,
    /// Some corners are inside, or the cell holds a polygon vertex.
    Boundary,
    /// No corner is inside the polygon.
    Outside,
}

/// A polygon prepared for subdivision.
///
/// Alongside the geometry it keeps, for every precision between the bounds,
/// the set of cells that contain at least one polygon vertex. Those cells skip
/// the corner test entirely.
#[derive(Debug, Clone)]
pub struct PolygonIndex {
    polygon: Polygon,
    bbox: BoundingBox,
    min_precision: usize,
    max_precision: usize,
    /// Indexed by precision; entries below `min_precision` stay empty.
    vertex_cells: Vec<FxHashSet<String>>,
}

impl PolygonIndex {
    /// Validate `polygon` and build its vertex-cell cache.
    pub fn new(polygon: Polygon, min_precision: usize, max_precision: usize) -> Result<Self> {
        validate_precision(min_precision, max_precision)?;
        let bbox = validate_polygon(&polygon)?;

        let mut finest = FxHashSet::default();
        for ring in rings(&polygon) {
            for coord in ring.coords() {
                finest.insert(encode(&Point::from(*coord), max_precision)?);
            }
        }

        let mut vertex_cells = vec![FxHashSet::default(); max_precision + 1];
        for precision in (min_precision..max_precision).rev() {
            vertex_cells[precision] = vertex_cells_above(&finest, precision);
        }
        vertex_cells[max_precision] = finest;

        Ok(Self {
            polygon,
            bbox,
            min_precision,
            max_precision,
            vertex_cells,
        })
    }

    pub fn polygon(&self) -> &Polygon {
        &self.polygon
    }

    pub fn bbox(&self) -> &BoundingBox {
        &self.bbox
    }

    pub fn min_precision(&self) -> usize {
        self.min_precision
    }

    pub fn max_precision(&self) -> usize {
        self.max_precision
    }

    /// Whether a polygon vertex falls inside `cell`.
    pub fn contains_vertex(&self, cell: &str) -> bool {
        self.vertex_cells
            .get(cell.len())
            .is_some_and(|cells| cells.contains(cell))
    }

    /// Classify `cell` against the polygon.
    ///
    /// A cell holding a polygon vertex is reported as [`CellClass::Boundary`]
    /// without any geometric test, which keeps vertex cells from being lost to
    /// degenerate ray casts. Every other cell is judged by its four corners
    /// alone, so a thin feature passing between the corners of a cell is not
    /// seen; `max_precision` has to be fine enough for the narrowest features.
    pub fn classify(&self, cell: &str) -> Result<CellClass> {
        if self.contains_vertex(cell) {
            return Ok(CellClass::Boundary);
        }

        let inside = cell_bbox(cell)?
            .corners()
            .iter()
            .filter(|corner| point_in_polygon(&self.polygon, corner))
            .count();

        Ok(match inside {
            4 => CellClass::Inside,
            0 => CellClass::Outside,
            _ => CellClass::Boundary,
        })
    }
}

/// Truncate every cell in `cells` to `precision`.
fn vertex_cells_above(cells: &FxHashSet<String>, precision: usize) -> FxHashSet<String> {
    cells
        .iter()
        .map(|cell| cell[..precision.min(cell.len())].to_string())
        .collect()
}
