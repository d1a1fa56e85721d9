use geo::{BoundingRect, Coord, Geometry, LineString, Point, Polygon, Rect};

use crate::error::{ImpactError, Result};
use crate::geom::geodesy::offset;

/// Number of vertices used to approximate the circular buffer.
const BUFFER_SEGMENTS: usize = 64;

/// A circular buffer of `radius_m` metres around a lon/lat center point.
///
/// The circle is approximated by a regular polygon on a local equirectangular
/// plane, which keeps the vertex error under a metre for buffers up to ~100 km.
#[derive(Debug, Clone, PartialEq)]
pub struct AreaOfInterest {
    center: Point<f64>,
    radius_m: f64,
    polygon: Polygon<f64>,
}

impl AreaOfInterest {
    /// Build a circular AOI around (`lon`, `lat`) with the given radius in metres.
    pub fn circle(lon: f64, lat: f64, radius_m: f64) -> Result<Self> {
        if !lon.is_finite() || !(-180.0..=180.0).contains(&lon) {
            return Err(ImpactError::config("aoi.lon", format!("{lon} is not a valid longitude")));
        }
        if !lat.is_finite() || lat.abs() >= 90.0 {
            return Err(ImpactError::config("aoi.lat", format!("{lat} is not a valid latitude")));
        }
        if !radius_m.is_finite() || radius_m <= 0.0 {
            return Err(ImpactError::config("aoi.buffer_km", "buffer radius must be positive"));
        }

        let origin = Coord { x: lon, y: lat };
        let mut ring = (0..BUFFER_SEGMENTS)
            .map(|i| {
                let theta = std::f64::consts::TAU * i as f64 / BUFFER_SEGMENTS as f64;
                offset(origin, radius_m * theta.sin(), radius_m * theta.cos())
            })
            .collect::<Vec<_>>();
        ring.push(ring[0]);

        Ok(Self {
            center: Point::new(lon, lat),
            radius_m,
            polygon: Polygon::new(LineString(ring), vec![]),
        })
    }

    /// Center point (lon, lat).
    #[inline] pub fn center(&self) -> Point<f64> { self.center }

    /// Buffer radius in metres.
    #[inline] pub fn radius_m(&self) -> f64 { self.radius_m }

    /// Polygon approximating the buffer.
    #[inline] pub fn polygon(&self) -> &Polygon<f64> { &self.polygon }

    /// The buffer as a generic geometry, ready for zonal reduction.
    pub fn geometry(&self) -> Geometry<f64> { Geometry::Polygon(self.polygon.clone()) }

    /// Bounding rectangle of the buffer polygon.
    pub fn bounds(&self) -> Rect<f64> {
        // A polygon built from BUFFER_SEGMENTS finite vertices always has bounds.
        self.polygon.bounding_rect()
            .unwrap_or_else(|| Rect::new(self.center.0, self.center.0))
    }
}
