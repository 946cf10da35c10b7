//! Bounding box of a gridded dataset in its own coordinate units.

use serde::{Deserialize, Serialize};

/// An axis-aligned box in dataset coordinate units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    /// Create a new bounding box from corner coordinates.
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Box spanned by cell centres, grown by half a cell on every side so it
    /// covers the cell edges.
    pub fn from_cell_centres(
        (min_x, max_x): (f64, f64),
        (min_y, max_y): (f64, f64),
        spacing_x: f64,
        spacing_y: f64,
    ) -> Self {
        let half_x = spacing_x / 2.0;
        let half_y = spacing_y / 2.0;
        Self::new(min_x - half_x, min_y - half_y, max_x + half_x, max_y + half_y)
    }
}
