//! Spherical-earth helpers for converting between metres and lon/lat degrees.
//!
//! All conversions use a mean earth radius; errors against the ellipsoid are
//! well below the resolution of the rasters this crate reduces.

use geo::Coord;

/// Mean earth radius in metres (IUGG).
pub(crate) const EARTH_RADIUS_M: f64 = 6_371_008.8;

/// Length of one degree of latitude, in metres.
#[inline]
pub(crate) fn metres_per_degree_lat() -> f64 {
    EARTH_RADIUS_M * std::f64::consts::PI / 180.0
}

/// Length of one degree of longitude at latitude `lat` (degrees), in metres.
#[inline]
pub(crate) fn metres_per_degree_lon(lat: f64) -> f64 {
    metres_per_degree_lat() * lat.to_radians().cos()
}

/// Area in m² of the lon/lat cell bounded by the given edges (degrees).
///
/// Exact on the sphere: `R² · Δλ · |sin φ_n - sin φ_s|`.
pub(crate) fn cell_area_m2(west: f64, east: f64, south: f64, north: f64) -> f64 {
    let d_lon = (east - west).abs().to_radians();
    let d_sin = (north.to_radians().sin() - south.to_radians().sin()).abs();
    EARTH_RADIUS_M * EARTH_RADIUS_M * d_lon * d_sin
}

/// Offset `origin` by `dx` metres east and `dy` metres north on a local
/// equirectangular plane.
pub(crate) fn offset(origin: Coord<f64>, dx: f64, dy: f64) -> Coord<f64> {
    Coord {
        x: origin.x + dx / metres_per_degree_lon(origin.y),
        y: origin.y + dy / metres_per_degree_lat(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hundred_metre_cell_at_equator_is_one_hectare() {
        let side = 100.0 / metres_per_degree_lat();
        let area = cell_area_m2(0.0, side, -side / 2.0, side / 2.0);
        assert!((area - 10_000.0).abs() < 1e-3, "area = {area}");
    }

    #[test]
    fn cell_area_shrinks_towards_the_poles() {
        let equator = cell_area_m2(0.0, 1.0, 0.0, 1.0);
        let north = cell_area_m2(0.0, 1.0, 60.0, 61.0);
        assert!(north < equator * 0.51);
    }

    #[test]
    fn offset_round_trips_through_metres() {
        let origin = Coord { x: 85.3, y: 27.5 };
        let moved = offset(origin, 1_000.0, -2_000.0);
        let dx = (moved.x - origin.x) * metres_per_degree_lon(origin.y);
        let dy = (moved.y - origin.y) * metres_per_degree_lat();
        assert!((dx - 1_000.0).abs() < 1e-6);
        assert!((dy + 2_000.0).abs() < 1e-6);
    }
}
