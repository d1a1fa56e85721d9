mod area;
mod loss;
mod report;

pub use area::total_flooded_area_km2;
pub use loss::{estimate_losses, LossRow, LossTable};
pub use report::{build_report, ImpactReport, TypeImpact, TypeSummary};
