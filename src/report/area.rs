use crate::error::{ImpactError, Result};
use crate::geom::AreaOfInterest;
use crate::raster::ChangeMask;
use crate::zonal::{reduce_over_geometry, PixelAreaWeighted, ReduceParams, Reducer, Reduction, UndeterminedReason};

/// Total flagged ground area inside `aoi`, in km².
///
/// Sums `mask × cell area` over the AOI; undefined cells contribute nothing.
/// An AOI without any defined cell has zero area. A reduction that could not
/// finish (budget, deadline) fails with `AreaUndetermined`.
pub fn total_flooded_area_km2(mask: &ChangeMask, aoi: &AreaOfInterest, params: &ReduceParams) -> Result<f64> {
    match reduce_over_geometry(&PixelAreaWeighted(mask), &aoi.geometry(), Reducer::Sum, params) {
        Reduction::Value(m2) => Ok(m2 / 1e6),
        Reduction::Undetermined(UndeterminedReason::NoCoverage) => Ok(0.0),
        Reduction::Undetermined(reason) => Err(ImpactError::AreaUndetermined { reason }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::geodesy::metres_per_degree_lat;
    use crate::raster::GridSpec;
    use ndarray::Array2;

    fn params() -> ReduceParams { ReduceParams::new(100.0, 1_000_000).unwrap() }

    /// A 21×21 grid of 100 m cells centered on (0, 0) with the given cells flagged.
    fn mask_with(flagged: &[(usize, usize)]) -> ChangeMask {
        let s = 100.0 / metres_per_degree_lat();
        let grid = GridSpec::new(-10.5 * s, 10.5 * s, s, s, 21, 21).unwrap();
        let mut cells = Array2::from_elem((21, 21), None);
        for &(r, c) in flagged {
            cells[[r, c]] = Some(1u8);
        }
        ChangeMask::from_cells(grid, cells).unwrap()
    }

    #[test]
    fn single_hectare_cell_is_a_hundredth_of_a_square_kilometre() {
        let aoi = AreaOfInterest::circle(0.0, 0.0, 500.0).unwrap();
        let area = total_flooded_area_km2(&mask_with(&[(10, 10)]), &aoi, &params()).unwrap();
        assert!((area - 0.01).abs() < 1e-9, "area = {area}");
    }

    #[test]
    fn cells_outside_the_aoi_are_ignored() {
        let aoi = AreaOfInterest::circle(0.0, 0.0, 500.0).unwrap();
        let area = total_flooded_area_km2(&mask_with(&[(10, 10), (10, 11), (0, 0)]), &aoi, &params()).unwrap();
        assert!((area - 0.02).abs() < 1e-9, "area = {area}");
    }

    #[test]
    fn fully_undefined_mask_has_zero_area() {
        let aoi = AreaOfInterest::circle(0.0, 0.0, 500.0).unwrap();
        assert_eq!(total_flooded_area_km2(&mask_with(&[]), &aoi, &params()).unwrap(), 0.0);
    }

    #[test]
    fn budget_overflow_is_an_error_not_zero() {
        let aoi = AreaOfInterest::circle(0.0, 0.0, 500.0).unwrap();
        let tight = ReduceParams::new(100.0, 4).unwrap();
        let err = total_flooded_area_km2(&mask_with(&[(10, 10)]), &aoi, &tight).unwrap_err();
        assert!(matches!(err, ImpactError::AreaUndetermined { reason: UndeterminedReason::BudgetExceeded }));
    }

    #[test]
    fn timeout_is_an_error_not_zero() {
        let aoi = AreaOfInterest::circle(0.0, 0.0, 500.0).unwrap();
        let expired = params().with_timeout(Some(std::time::Duration::ZERO));
        let err = total_flooded_area_km2(&mask_with(&[(10, 10)]), &aoi, &expired).unwrap_err();
        assert!(matches!(err, ImpactError::AreaUndetermined { reason: UndeterminedReason::TimedOut }));
    }
}
