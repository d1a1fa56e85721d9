use std::time::{Duration, Instant};

use geo::{BoundingRect, Contains, Geometry, Intersects, Point, Rect};

use crate::error::{ImpactError, Result};
use crate::zonal::plan::{plan, SamplePlan, SamplingGrid};
use crate::zonal::reducer::Accumulator;
use crate::zonal::{Reducer, Reduction, SampleCell, SampledField, UndeterminedReason};

/// Resolution, budget and deadline for a single zonal reduction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReduceParams {
    scale_m: f64,
    pixel_budget: u64,
    best_effort: bool,
    timeout: Option<Duration>,
}

impl ReduceParams {
    /// Sample at `scale_m` metres, visiting at most `pixel_budget` cells.
    pub fn new(scale_m: f64, pixel_budget: u64) -> Result<Self> {
        if !scale_m.is_finite() || scale_m <= 0.0 {
            return Err(ImpactError::config("reduction.scale_m", "scale must be positive"));
        }
        if pixel_budget == 0 {
            return Err(ImpactError::config("reduction.pixel_budget", "pixel budget must be positive"));
        }
        Ok(Self { scale_m, pixel_budget, best_effort: false, timeout: None })
    }

    /// Allow automatic coarsening when a footprint exceeds the budget.
    pub fn with_best_effort(self, best_effort: bool) -> Self { Self { best_effort, ..self } }

    /// Abandon a single reduction after `timeout`.
    pub fn with_timeout(self, timeout: Option<Duration>) -> Self { Self { timeout, ..self } }

    #[inline] pub fn scale_m(&self) -> f64 { self.scale_m }
    #[inline] pub fn pixel_budget(&self) -> u64 { self.pixel_budget }
    #[inline] pub fn best_effort(&self) -> bool { self.best_effort }
    #[inline] pub fn timeout(&self) -> Option<Duration> { self.timeout }
}

/// Reduce `field` over the footprint of `geometry`.
///
/// Areal geometries select sample cells by center containment, falling back
/// to every intersecting cell when the footprint is smaller than one cell.
/// Lines and points select every intersecting cell.
pub fn reduce_over_geometry<F>(field: &F, geometry: &Geometry<f64>, reducer: Reducer, params: &ReduceParams) -> Reduction
where
    F: SampledField + ?Sized,
{
    let deadline = params.timeout.map(|t| Instant::now() + t);

    let Some(bounds) = geometry.bounding_rect().filter(is_finite) else {
        return Reduction::Undetermined(UndeterminedReason::InvalidGeometry);
    };

    let grid = SamplingGrid::new(field.grid(), params.scale_m);
    let Some(plan) = plan(grid, &bounds, params.pixel_budget, params.best_effort) else {
        return Reduction::Undetermined(UndeterminedReason::BudgetExceeded);
    };
    if plan.coarsening > 1 {
        tracing::trace!(coarsening = plan.coarsening, scale_m = plan.grid.scale_m(), "reducing at coarsened scale");
    }

    let outcome = if is_areal(geometry) {
        match scan(field, &plan, reducer, deadline, |cell| contains_center(geometry, cell)) {
            Scan::Empty => scan(field, &plan, reducer, deadline, |cell| geometry.intersects(&cell.bounds)),
            other => other,
        }
    } else {
        scan(field, &plan, reducer, deadline, |cell| geometry.intersects(&cell.bounds))
    };

    match outcome {
        Scan::Done(acc) => match acc.finish() {
            Some(v) => Reduction::Value(v),
            None => Reduction::Undetermined(UndeterminedReason::NoCoverage),
        },
        Scan::Empty => Reduction::Undetermined(UndeterminedReason::NoCoverage),
        Scan::TimedOut => Reduction::Undetermined(UndeterminedReason::TimedOut),
    }
}

enum Scan {
    /// At least one sample cell was selected.
    Done(Accumulator),
    /// No sample cell was selected.
    Empty,
    TimedOut,
}

/// Walk the plan row by row, accumulating the field over selected cells.
fn scan<F, S>(field: &F, plan: &SamplePlan, reducer: Reducer, deadline: Option<Instant>, select: S) -> Scan
where
    F: SampledField + ?Sized,
    S: Fn(&SampleCell) -> bool,
{
    let mut acc = reducer.accumulator();
    let mut selected = 0u64;
    for row in plan.window.rows.clone() {
        if deadline.is_some_and(|d| Instant::now() >= d) { return Scan::TimedOut }
        for col in plan.window.cols.clone() {
            let cell = plan.grid.cell(row, col);
            if !select(&cell) { continue }
            selected += 1;
            if let Some(v) = field.value_at(&cell) {
                acc.push(v);
            }
        }
    }
    if selected == 0 { Scan::Empty } else { Scan::Done(acc) }
}

#[inline]
fn is_finite(rect: &Rect<f64>) -> bool {
    rect.min().x.is_finite() && rect.min().y.is_finite()
        && rect.max().x.is_finite() && rect.max().y.is_finite()
}

#[inline]
fn is_areal(geometry: &Geometry<f64>) -> bool {
    matches!(geometry, Geometry::Polygon(_) | Geometry::MultiPolygon(_) | Geometry::Rect(_) | Geometry::Triangle(_))
}

fn contains_center(geometry: &Geometry<f64>, cell: &SampleCell) -> bool {
    let center = Point::from(cell.center);
    match geometry {
        Geometry::Polygon(p) => p.contains(&center),
        Geometry::MultiPolygon(mp) => mp.contains(&center),
        Geometry::Rect(r) => r.contains(&center),
        Geometry::Triangle(t) => t.contains(&center),
        _ => false,
    }
}
