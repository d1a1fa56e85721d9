mod field;
mod plan;
mod reduce;
mod reducer;

pub use field::{PixelAreaWeighted, SampleCell, SampledField};
pub use reduce::{reduce_over_geometry, ReduceParams};
pub use reducer::{Reducer, Reduction, UndeterminedReason};
