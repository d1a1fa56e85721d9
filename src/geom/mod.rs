mod aoi;
pub(crate) mod geodesy;

pub use aoi::AreaOfInterest;
