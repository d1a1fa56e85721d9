use geo::{Coord, Rect};

use crate::raster::{ChangeMask, GridSpec};

/// One cell of the sampling grid a reduction walks over.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleCell {
    pub bounds: Rect<f64>,
    pub center: Coord<f64>,
    /// Spherical area of the cell in m².
    pub area_m2: f64,
}

/// A raster band that can be read at sampling-grid cells.
pub trait SampledField: Sync {
    /// Grid the sampling grid is anchored to.
    fn grid(&self) -> &GridSpec;

    /// Value at `cell`, or `None` if the cell is undefined.
    fn value_at(&self, cell: &SampleCell) -> Option<f64>;
}

impl SampledField for ChangeMask {
    #[inline]
    fn grid(&self) -> &GridSpec { ChangeMask::grid(self) }

    #[inline]
    fn value_at(&self, cell: &SampleCell) -> Option<f64> {
        self.sample(cell.center.x, cell.center.y).map(f64::from)
    }
}

/// The mask multiplied by per-cell ground area, so that a `Sum` reduction
/// yields flagged area in m².
#[derive(Debug, Clone, Copy)]
pub struct PixelAreaWeighted<'a>(pub &'a ChangeMask);

impl SampledField for PixelAreaWeighted<'_> {
    #[inline]
    fn grid(&self) -> &GridSpec { self.0.grid() }

    #[inline]
    fn value_at(&self, cell: &SampleCell) -> Option<f64> {
        self.0.sample(cell.center.x, cell.center.y)
            .map(|v| f64::from(v) * cell.area_m2)
    }
}
