mod change;
mod grid;
mod mask;
mod observation;

pub use change::detect_change;
pub use grid::GridSpec;
pub use mask::ChangeMask;
pub use observation::RasterObservation;
