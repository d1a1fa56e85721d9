use ndarray::Array2;

use crate::error::{ImpactError, Result};
use crate::raster::GridSpec;

/// A self-masked binary raster: defined cells are exactly `0` or `1`,
/// undefined cells (`None`) are excluded from every reduction.
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeMask {
    grid: GridSpec,
    cells: Array2<Option<u8>>,
}

impl ChangeMask {
    /// Wrap `cells` on `grid`, rejecting any defined value other than 0 or 1.
    pub fn from_cells(grid: GridSpec, cells: Array2<Option<u8>>) -> Result<Self> {
        grid.validate()?;
        if cells.dim() != grid.shape() {
            return Err(ImpactError::InvalidMask {
                reason: format!("cell array shape {:?} does not match grid shape {:?}", cells.dim(), grid.shape()),
            });
        }
        if let Some(bad) = cells.iter().flatten().find(|&&v| v > 1) {
            return Err(ImpactError::InvalidMask { reason: format!("defined cell has value {bad}") });
        }
        Ok(Self { grid, cells })
    }

    /// Construct without validation; callers guarantee the {0, 1} invariant.
    pub(crate) fn from_cells_unchecked(grid: GridSpec, cells: Array2<Option<u8>>) -> Self {
        debug_assert_eq!(cells.dim(), grid.shape());
        Self { grid, cells }
    }

    #[inline] pub fn grid(&self) -> &GridSpec { &self.grid }

    #[inline] pub fn cells(&self) -> &Array2<Option<u8>> { &self.cells }

    /// Value of the cell at (`row`, `col`); `None` if undefined or out of range.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Option<u8> {
        self.cells.get((row, col)).copied().flatten()
    }

    /// Value of the cell containing (`lon`, `lat`); `None` if undefined or outside the grid.
    #[inline]
    pub fn sample(&self, lon: f64, lat: f64) -> Option<u8> {
        self.grid.cell_at(lon, lat).and_then(|(row, col)| self.get(row, col))
    }

    /// Number of cells with value 1.
    pub fn flagged_count(&self) -> usize {
        self.cells.iter().filter(|v| **v == Some(1)).count()
    }

    /// Number of defined cells (0 or 1).
    pub fn defined_count(&self) -> usize {
        self.cells.iter().filter(|v| v.is_some()).count()
    }
}
