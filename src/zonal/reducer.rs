use serde::Serialize;

/// Summary statistic computed over the defined cells of a footprint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reducer {
    /// Largest defined value (classification).
    Max,
    /// Sum of defined values (area).
    Sum,
}

impl Reducer {
    pub(crate) fn accumulator(self) -> Accumulator {
        Accumulator { reducer: self, value: None }
    }
}

/// Running state of a reduction. Stays `None` until a defined cell is seen.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Accumulator {
    reducer: Reducer,
    value: Option<f64>,
}

impl Accumulator {
    #[inline]
    pub(crate) fn push(&mut self, v: f64) {
        self.value = Some(match (self.reducer, self.value) {
            (_, None) => v,
            (Reducer::Max, Some(acc)) => acc.max(v),
            (Reducer::Sum, Some(acc)) => acc + v,
        });
    }

    #[inline]
    pub(crate) fn finish(self) -> Option<f64> { self.value }
}

/// Why a reduction produced no value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UndeterminedReason {
    /// The footprint covers no defined mask cell.
    NoCoverage,
    /// The footprint needs more sample cells than the pixel budget allows.
    BudgetExceeded,
    /// The reduction ran past its deadline.
    TimedOut,
    /// The geometry is empty or has non-finite coordinates.
    InvalidGeometry,
}

/// Outcome of a zonal reduction. An undetermined reduction is a distinct
/// case and must never be read as zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Reduction {
    Value(f64),
    Undetermined(UndeterminedReason),
}

impl Reduction {
    /// The reduced value, if one was produced.
    #[inline]
    pub fn value(self) -> Option<f64> {
        match self {
            Reduction::Value(v) => Some(v),
            Reduction::Undetermined(_) => None,
        }
    }
}
