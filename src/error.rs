//! Error types for the impact pipeline.

use thiserror::Error;

use crate::zonal::UndeterminedReason;

/// Fatal pipeline errors. Per-geometry failures are never reported here;
/// they degrade to [`crate::ZonalResult::Undetermined`] instead.
#[derive(Debug, Error)]
pub enum ImpactError {
    /// Two rasters that must be co-registered are not.
    #[error("Input rasters do not match: {reason}")]
    InputMismatch { reason: String },

    /// A change mask contains a defined value other than 0 or 1, or its
    /// cell array disagrees with its grid.
    #[error("Invalid change mask: {reason}")]
    InvalidMask { reason: String },

    /// A composite was requested over zero scenes.
    #[error("Cannot composite an empty set of observations")]
    EmptyComposite,

    /// The flooded-area reduction over the AOI did not produce a value.
    #[error("Flooded area could not be determined: {reason:?}")]
    AreaUndetermined { reason: UndeterminedReason },

    /// A configuration field has an invalid value.
    #[error("Invalid configuration value for '{field}': {reason}")]
    InvalidConfig { field: String, reason: String },

    /// A configuration document could not be parsed.
    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// The bounded worker pool could not be created.
    #[error("Failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

impl ImpactError {
    pub(crate) fn mismatch(reason: impl Into<String>) -> Self {
        Self::InputMismatch { reason: reason.into() }
    }

    pub(crate) fn config(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidConfig { field: field.into(), reason: reason.into() }
    }
}

pub type Result<T, E = ImpactError> = std::result::Result<T, E>;
