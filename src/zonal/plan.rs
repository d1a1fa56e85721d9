use geo::{Coord, Rect};

use crate::geom::geodesy::{cell_area_m2, metres_per_degree_lat, metres_per_degree_lon};
use crate::raster::GridSpec;
use crate::zonal::SampleCell;

/// Upper bound on best-effort coarsening rounds.
const MAX_COARSENING_ROUNDS: u32 = 32;

/// Largest sample index addressed exactly (every integer up to 2^53 is an f64).
const MAX_INDEX: f64 = 9_007_199_254_740_992.0;

/// Regular lon/lat sampling grid at a fixed ground resolution, anchored at
/// the north-west corner of the source grid and clipped to its extent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct SamplingGrid {
    west: f64,
    north: f64,
    east: f64,
    south: f64,
    step_lon: f64,
    step_lat: f64,
    scale_m: f64,
}

impl SamplingGrid {
    /// Steps are `scale_m` metres converted at the source grid's center latitude,
    /// so every footprint reduced against one grid shares the same cells.
    pub(crate) fn new(source: &GridSpec, scale_m: f64) -> Self {
        let lat = source.center_lat();
        Self {
            west: source.west,
            north: source.north,
            east: source.east(),
            south: source.south(),
            step_lon: scale_m / metres_per_degree_lon(lat),
            step_lat: scale_m / metres_per_degree_lat(),
            scale_m,
        }
    }

    #[inline] pub(crate) fn scale_m(&self) -> f64 { self.scale_m }

    /// The same grid with every step multiplied by `factor`.
    fn coarsened(&self, factor: f64) -> Self {
        Self {
            step_lon: self.step_lon * factor,
            step_lat: self.step_lat * factor,
            scale_m: self.scale_m * factor,
            ..*self
        }
    }

    /// Range of sample cells covering `bounds`, clipped to the source grid.
    ///
    /// `None` when the grid is too fine to index, i.e. it spans more than
    /// 2^53 cells along an axis.
    pub(crate) fn window(&self, bounds: &Rect<f64>) -> Option<SampleWindow> {
        let cols = ((self.east - self.west) / self.step_lon).ceil();
        let rows = ((self.north - self.south) / self.step_lat).ceil();
        if !(cols.is_finite() && rows.is_finite()) || cols.max(rows) > MAX_INDEX {
            return None;
        }

        // Cells outside the source grid are always undefined; never visit them.
        let clip = |v: f64, hi: f64| v.max(0.0).min(hi) as i64;
        let col0 = clip(((bounds.min().x - self.west) / self.step_lon).floor(), cols);
        let col1 = clip(((bounds.max().x - self.west) / self.step_lon).floor() + 1.0, cols);
        let row0 = clip(((self.north - bounds.max().y) / self.step_lat).floor(), rows);
        let row1 = clip(((self.north - bounds.min().y) / self.step_lat).floor() + 1.0, rows);
        Some(SampleWindow { rows: row0..row1, cols: col0..col1 })
    }

    /// Sample cell at (`row`, `col`).
    pub(crate) fn cell(&self, row: i64, col: i64) -> SampleCell {
        let west = self.west + col as f64 * self.step_lon;
        let north = self.north - row as f64 * self.step_lat;
        let east = west + self.step_lon;
        let south = north - self.step_lat;
        SampleCell {
            bounds: Rect::new(Coord { x: west, y: south }, Coord { x: east, y: north }),
            center: Coord { x: 0.5 * (west + east), y: 0.5 * (south + north) },
            area_m2: cell_area_m2(west, east, south, north),
        }
    }
}

/// Rows and columns of the sample cells a footprint's bounding box touches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SampleWindow {
    pub(crate) rows: std::ops::Range<i64>,
    pub(crate) cols: std::ops::Range<i64>,
}

impl SampleWindow {
    /// Number of sample cells in the window.
    pub(crate) fn len(&self) -> u64 {
        let span = |r: &std::ops::Range<i64>| r.end.saturating_sub(r.start).max(0) as u64;
        span(&self.rows).saturating_mul(span(&self.cols))
    }
}

/// Sampling plan for one footprint after the pixel budget has been applied.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SamplePlan {
    pub(crate) grid: SamplingGrid,
    pub(crate) window: SampleWindow,
    /// Factor the requested scale was multiplied by (1 if no coarsening).
    pub(crate) coarsening: u64,
}

/// Fit the footprint `bounds` into `pixel_budget` sample cells.
///
/// Without `best_effort`, an oversized footprint yields `None`. With it, the
/// scale grows by `ceil(sqrt(n / budget))` until the window fits, so the same
/// overflow ratio always produces the same plan.
pub(crate) fn plan(grid: SamplingGrid, bounds: &Rect<f64>, pixel_budget: u64, best_effort: bool) -> Option<SamplePlan> {
    let mut current = grid;
    let mut coarsening = 1u64;
    for _ in 0..MAX_COARSENING_ROUNDS {
        // A grid too fine to index counts as overflowing any budget.
        let window = current.window(bounds);
        let n = window.as_ref().map_or(u64::MAX, SampleWindow::len);
        if let Some(window) = window.filter(|_| n <= pixel_budget) {
            return Some(SamplePlan { grid: current, window, coarsening });
        }
        if !best_effort { return None }

        let factor = ((n as f64 / pixel_budget as f64).sqrt().ceil() as u64).max(2);
        coarsening = coarsening.saturating_mul(factor);
        current = grid.coarsened(coarsening as f64);
        tracing::debug!(cells = n, pixel_budget, scale_m = current.scale_m(), "coarsening sample grid");
    }
    None
}
