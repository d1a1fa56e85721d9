use geo::{Coord, Rect};
use serde::{Deserialize, Serialize};

use crate::error::{ImpactError, Result};

/// Relative tolerance (in cells) when comparing two grids for co-registration.
const REGISTRATION_TOL: f64 = 1e-6;

/// A north-up lon/lat raster grid. Row 0 is the northernmost row, column 0
/// the westernmost column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridSpec {
    pub west: f64,
    pub north: f64,
    pub cell_width_deg: f64,
    pub cell_height_deg: f64,
    pub rows: usize,
    pub cols: usize,
}

impl GridSpec {
    /// Construct a grid, rejecting non-finite corners and non-positive cell sizes.
    pub fn new(west: f64, north: f64, cell_width_deg: f64, cell_height_deg: f64, rows: usize, cols: usize) -> Result<Self> {
        let grid = Self { west, north, cell_width_deg, cell_height_deg, rows, cols };
        grid.validate()?;
        Ok(grid)
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if !self.west.is_finite() || !self.north.is_finite() {
            return Err(ImpactError::mismatch("grid origin must be finite"));
        }
        if !(self.cell_width_deg.is_finite() && self.cell_width_deg > 0.0)
            || !(self.cell_height_deg.is_finite() && self.cell_height_deg > 0.0) {
            return Err(ImpactError::mismatch("grid cell size must be positive"));
        }
        Ok(())
    }

    /// (rows, cols)
    #[inline] pub fn shape(&self) -> (usize, usize) { (self.rows, self.cols) }

    #[inline] pub fn east(&self) -> f64 { self.west + self.cols as f64 * self.cell_width_deg }

    #[inline] pub fn south(&self) -> f64 { self.north - self.rows as f64 * self.cell_height_deg }

    /// Latitude halfway between the north and south edges.
    #[inline] pub fn center_lat(&self) -> f64 { 0.5 * (self.north + self.south()) }

    /// Full extent of the grid.
    pub fn bounds(&self) -> Rect<f64> {
        Rect::new(
            Coord { x: self.west, y: self.south() },
            Coord { x: self.east(), y: self.north },
        )
    }

    /// Extent of the cell at (`row`, `col`).
    pub fn cell_bounds(&self, row: usize, col: usize) -> Rect<f64> {
        let west = self.west + col as f64 * self.cell_width_deg;
        let north = self.north - row as f64 * self.cell_height_deg;
        Rect::new(
            Coord { x: west, y: north - self.cell_height_deg },
            Coord { x: west + self.cell_width_deg, y: north },
        )
    }

    /// The (row, col) of the cell containing (`lon`, `lat`), if inside the grid.
    pub fn cell_at(&self, lon: f64, lat: f64) -> Option<(usize, usize)> {
        let col = ((lon - self.west) / self.cell_width_deg).floor();
        let row = ((self.north - lat) / self.cell_height_deg).floor();
        let in_range = |v: f64, n: usize| v >= 0.0 && v < n as f64;
        (in_range(row, self.rows) && in_range(col, self.cols)).then(|| (row as usize, col as usize))
    }

    /// Fail with `InputMismatch` unless `other` describes the same cells.
    pub fn ensure_matches(&self, other: &GridSpec) -> Result<()> {
        if self.shape() != other.shape() {
            return Err(ImpactError::mismatch(format!(
                "grid shapes differ: {:?} vs {:?}", self.shape(), other.shape()
            )));
        }

        let close = |a: f64, b: f64, cell: f64| (a - b).abs() <= REGISTRATION_TOL * cell;
        if !close(self.cell_width_deg, other.cell_width_deg, self.cell_width_deg)
            || !close(self.cell_height_deg, other.cell_height_deg, self.cell_height_deg) {
            return Err(ImpactError::mismatch(format!(
                "cell sizes differ: {}x{} vs {}x{}",
                self.cell_width_deg, self.cell_height_deg, other.cell_width_deg, other.cell_height_deg
            )));
        }
        if !close(self.west, other.west, self.cell_width_deg)
            || !close(self.north, other.north, self.cell_height_deg) {
            return Err(ImpactError::mismatch(format!(
                "grid origins differ: ({}, {}) vs ({}, {})",
                self.west, self.north, other.west, other.north
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> GridSpec {
        GridSpec::new(10.0, 20.0, 0.5, 0.25, 4, 6).unwrap()
    }

    #[test]
    fn extent_follows_north_up_layout() {
        let grid = grid();
        assert_eq!(grid.east(), 13.0);
        assert_eq!(grid.south(), 19.0);
        assert_eq!(grid.center_lat(), 19.5);
    }

    #[test]
    fn cell_lookup_is_row_major_from_the_north_west() {
        let grid = grid();
        assert_eq!(grid.cell_at(10.1, 19.9), Some((0, 0)));
        assert_eq!(grid.cell_at(12.9, 19.1), Some((3, 5)));
        assert_eq!(grid.cell_at(9.9, 19.9), None);
        assert_eq!(grid.cell_at(10.1, 20.1), None);
        assert_eq!(grid.cell_at(13.0, 19.5), None);
    }

    #[test]
    fn cell_bounds_contain_their_center() {
        let grid = grid();
        let rect = grid.cell_bounds(2, 3);
        assert_eq!(grid.cell_at(rect.center().x, rect.center().y), Some((2, 3)));
    }

    #[test]
    fn mismatched_grids_are_rejected() {
        let grid = grid();
        assert!(grid.ensure_matches(&grid).is_ok());

        let shifted = GridSpec { west: 10.25, ..grid };
        assert!(matches!(grid.ensure_matches(&shifted), Err(ImpactError::InputMismatch { .. })));

        let resized = GridSpec { rows: 5, ..grid };
        assert!(matches!(grid.ensure_matches(&resized), Err(ImpactError::InputMismatch { .. })));

        let coarser = GridSpec { cell_width_deg: 1.0, cols: 3, ..grid };
        assert!(grid.ensure_matches(&coarser).is_err());
    }

    #[test]
    fn degenerate_cells_are_rejected() {
        assert!(GridSpec::new(0.0, 0.0, 0.0, 1.0, 1, 1).is_err());
        assert!(GridSpec::new(0.0, f64::NAN, 1.0, 1.0, 1, 1).is_err());
    }
}
