#![doc = "floodimpact public API"]
mod assets;
mod config;
mod error;
mod geom;
mod pipeline;
mod raster;
mod report;
mod zonal;

pub mod io;

#[doc(inline)]
pub use assets::{classify, AffectedAsset, AssetCollection, AssetGeometry, AssetType, Classification, ZonalResult};

#[doc(inline)]
pub use config::{AoiConfig, CostConfig, DateConfig, DetectionConfig, ImpactConfig, LimitConfig, ReductionConfig};

#[doc(inline)]
pub use error::{ImpactError, Result};

#[doc(inline)]
pub use geom::AreaOfInterest;

#[doc(inline)]
pub use pipeline::{Assessment, AssessmentInputs};

#[doc(inline)]
pub use raster::{detect_change, ChangeMask, GridSpec, RasterObservation};

#[doc(inline)]
pub use report::{build_report, estimate_losses, total_flooded_area_km2, ImpactReport, LossRow, LossTable, TypeImpact, TypeSummary};

#[doc(inline)]
pub use zonal::{reduce_over_geometry, PixelAreaWeighted, ReduceParams, Reducer, Reduction, SampleCell, SampledField, UndeterminedReason};
