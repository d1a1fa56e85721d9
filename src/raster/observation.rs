use ndarray::{Array2, Zip};

use crate::error::{ImpactError, Result};
use crate::raster::GridSpec;

/// A single-band scalar raster (e.g. VV backscatter in dB) over a lon/lat grid.
/// `NaN` cells carry no data.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterObservation {
    grid: GridSpec,
    values: Array2<f64>,
}

impl RasterObservation {
    /// Wrap `values` (shape `(rows, cols)`) on `grid`.
    pub fn new(grid: GridSpec, values: Array2<f64>) -> Result<Self> {
        grid.validate()?;
        if values.dim() != grid.shape() {
            return Err(ImpactError::mismatch(format!(
                "value array shape {:?} does not match grid shape {:?}", values.dim(), grid.shape()
            )));
        }
        Ok(Self { grid, values })
    }

    /// A raster with every cell set to `value`.
    pub fn filled(grid: GridSpec, value: f64) -> Result<Self> {
        Self::new(grid, Array2::from_elem(grid.shape(), value))
    }

    #[inline] pub fn grid(&self) -> &GridSpec { &self.grid }

    #[inline] pub fn values(&self) -> &Array2<f64> { &self.values }

    /// Per-cell mean of co-registered `scenes`, ignoring `NaN` cells.
    /// A cell with no data in every scene stays `NaN`.
    pub fn mean_composite(scenes: &[RasterObservation]) -> Result<Self> {
        let (first, rest) = scenes.split_first().ok_or(ImpactError::EmptyComposite)?;
        for scene in rest {
            first.grid.ensure_matches(&scene.grid)?;
        }
        if rest.is_empty() {
            return Ok(first.clone());
        }

        let shape = first.grid.shape();
        let mut sum = Array2::<f64>::zeros(shape);
        let mut count = Array2::<u32>::zeros(shape);
        for scene in scenes {
            Zip::from(&mut sum).and(&mut count).and(&scene.values)
                .for_each(|s, n, &v| {
                    if !v.is_nan() {
                        *s += v;
                        *n += 1;
                    }
                });
        }

        let values = Zip::from(&sum).and(&count)
            .par_map_collect(|&s, &n| if n == 0 { f64::NAN } else { s / n as f64 });

        tracing::debug!(scenes = scenes.len(), rows = shape.0, cols = shape.1, "built mean composite");
        Self::new(first.grid, values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn grid() -> GridSpec {
        GridSpec::new(0.0, 1.0, 0.5, 0.5, 2, 2).unwrap()
    }

    #[test]
    fn shape_must_match_grid() {
        let err = RasterObservation::new(grid(), Array2::zeros((3, 2))).unwrap_err();
        assert!(matches!(err, ImpactError::InputMismatch { .. }));
    }

    #[test]
    fn mean_composite_skips_missing_cells() {
        let a = RasterObservation::new(grid(), array![[-10.0, f64::NAN], [-8.0, f64::NAN]]).unwrap();
        let b = RasterObservation::new(grid(), array![[-12.0, -4.0], [f64::NAN, f64::NAN]]).unwrap();
        let mean = RasterObservation::mean_composite(&[a, b]).unwrap();

        assert_eq!(mean.values()[[0, 0]], -11.0);
        assert_eq!(mean.values()[[0, 1]], -4.0);
        assert_eq!(mean.values()[[1, 0]], -8.0);
        assert!(mean.values()[[1, 1]].is_nan());
    }

    #[test]
    fn mean_composite_of_nothing_is_an_error() {
        assert!(matches!(RasterObservation::mean_composite(&[]), Err(ImpactError::EmptyComposite)));
    }

    #[test]
    fn mean_composite_requires_coregistration() {
        let a = RasterObservation::filled(grid(), 1.0).unwrap();
        let other = GridSpec { west: 5.0, ..grid() };
        let b = RasterObservation::filled(other, 1.0).unwrap();
        assert!(matches!(
            RasterObservation::mean_composite(&[a, b]),
            Err(ImpactError::InputMismatch { .. })
        ));
    }
}
