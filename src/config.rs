//! Run configuration.
//!
//! Every parameter the pipeline needs is carried by [`ImpactConfig`] and passed
//! explicitly into each stage. Every field has a default, so a TOML document
//! only needs the values it overrides:
//!
//! ```toml
//! [aoi]
//! lat = 27.5
//! lon = 85.3
//! buffer_km = 10.0
//!
//! [costs]
//! building = 500000.0
//! currency = "INR"
//! ```

use std::time::Duration;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::assets::AssetType;
use crate::error::{ImpactError, Result};
use crate::geom::AreaOfInterest;
use crate::zonal::ReduceParams;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImpactConfig {
    pub aoi: AoiConfig,
    pub dates: DateConfig,
    pub detection: DetectionConfig,
    pub reduction: ReductionConfig,
    pub costs: CostConfig,
    pub limits: LimitConfig,
}

/// Circular area of interest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AoiConfig {
    pub lat: f64,
    pub lon: f64,
    pub buffer_km: f64,
}

impl Default for AoiConfig {
    fn default() -> Self {
        Self { lat: 27.5, lon: 85.3, buffer_km: 10.0 }
    }
}

/// Observation dates as `YYYY-MM-DD`; the post-event date must follow the
/// pre-event one. Scenes for these dates are selected by whoever supplies
/// the rasters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DateConfig {
    pub pre: String,
    pub post: String,
}

impl Default for DateConfig {
    fn default() -> Self {
        Self { pre: "2023-07-01".into(), post: "2023-07-15".into() }
    }
}

impl DateConfig {
    /// Parsed (pre, post) dates.
    pub fn parse(&self) -> Result<(NaiveDate, NaiveDate)> {
        let parse = |field: &str, value: &str| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .map_err(|e| ImpactError::config(field, format!("'{value}' is not a YYYY-MM-DD date: {e}")))
        };
        let pre = parse("dates.pre", &self.pre)?;
        let post = parse("dates.post", &self.post)?;
        if post <= pre {
            return Err(ImpactError::config("dates.post", format!("{post} is not after the pre-event date {pre}")));
        }
        Ok((pre, post))
    }
}

/// Change detection cutoff on `pre - post`, in dB.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DetectionConfig {
    pub threshold: f64,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self { threshold: -1.5 }
    }
}

/// Zonal reduction resolution, budget and worker limits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReductionConfig {
    pub scale_m: f64,
    pub pixel_budget: u64,
    pub best_effort: bool,
    /// Per-geometry timeout in milliseconds.
    pub timeout_ms: Option<u64>,
    /// Worker threads; the global rayon pool when unset.
    pub threads: Option<usize>,
}

impl Default for ReductionConfig {
    fn default() -> Self {
        Self { scale_m: 100.0, pixel_budget: 10_000_000_000_000, best_effort: false, timeout_ms: None, threads: None }
    }
}

/// Flat per-asset unit costs and report ordering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CostConfig {
    pub building: f64,
    pub road: f64,
    pub hospital: f64,
    pub currency: String,
    /// Order of asset types in the report.
    pub order: Vec<AssetType>,
}

impl Default for CostConfig {
    fn default() -> Self {
        Self {
            building: 500_000.0,
            road: 1_000_000.0,
            hospital: 5_000_000.0,
            currency: "INR".into(),
            order: AssetType::ALL.to_vec(),
        }
    }
}

impl CostConfig {
    pub fn unit_cost(&self, asset_type: AssetType) -> f64 {
        match asset_type {
            AssetType::Building => self.building,
            AssetType::Road => self.road,
            AssetType::Hospital => self.hospital,
        }
    }
}

/// Optional caps on the number of assets assessed per type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LimitConfig {
    pub building: Option<usize>,
    pub road: Option<usize>,
    pub hospital: Option<usize>,
}

impl LimitConfig {
    pub fn limit(&self, asset_type: AssetType) -> Option<usize> {
        match asset_type {
            AssetType::Building => self.building,
            AssetType::Road => self.road,
            AssetType::Hospital => self.hospital,
        }
    }
}

impl ImpactConfig {
    /// Parse a TOML document; absent fields keep their defaults.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    /// Check every field, reporting the first invalid one.
    pub fn validate(&self) -> Result<()> {
        self.aoi()?;
        self.reduce_params()?;
        self.dates.parse()?;

        if !self.detection.threshold.is_finite() {
            return Err(ImpactError::config("detection.threshold", "threshold must be finite"));
        }

        for asset_type in AssetType::ALL {
            let cost = self.costs.unit_cost(asset_type);
            if !cost.is_finite() || cost < 0.0 {
                return Err(ImpactError::config(
                    format!("costs.{}", asset_type.as_str().to_lowercase()),
                    format!("unit cost must be a non-negative number, got {cost}"),
                ));
            }
        }

        let order = &self.costs.order;
        if order.len() != AssetType::ALL.len() || AssetType::ALL.iter().any(|t| !order.contains(t)) {
            return Err(ImpactError::config("costs.order", "must list every asset type exactly once"));
        }

        if self.reduction.threads == Some(0) {
            return Err(ImpactError::config("reduction.threads", "must be at least 1"));
        }
        Ok(())
    }

    /// The circular AOI described by `aoi`.
    pub fn aoi(&self) -> Result<AreaOfInterest> {
        AreaOfInterest::circle(self.aoi.lon, self.aoi.lat, self.aoi.buffer_km * 1000.0)
    }

    /// Reduction parameters described by `reduction`.
    pub fn reduce_params(&self) -> Result<ReduceParams> {
        Ok(ReduceParams::new(self.reduction.scale_m, self.reduction.pixel_budget)?
            .with_best_effort(self.reduction.best_effort)
            .with_timeout(self.reduction.timeout_ms.map(Duration::from_millis)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn defaults_are_valid() {
        let config = ImpactConfig::default();
        config.validate().unwrap();
        assert_eq!(config.costs.unit_cost(AssetType::Hospital), 5_000_000.0);
        assert_eq!(config.detection.threshold, -1.5);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = ImpactConfig::from_toml_str(r#"
            [aoi]
            buffer_km = 25.0

            [costs]
            road = 750000.0
            order = ["Hospital", "Building", "Road"]

            [limits]
            hospital = 10
        "#).unwrap();

        assert_eq!(config.aoi.buffer_km, 25.0);
        assert_eq!(config.aoi.lat, 27.5);
        assert_eq!(config.costs.unit_cost(AssetType::Road), 750_000.0);
        assert_eq!(config.costs.order[0], AssetType::Hospital);
        assert_eq!(config.limits.limit(AssetType::Hospital), Some(10));
        assert_eq!(config.limits.limit(AssetType::Road), None);
        config.validate().unwrap();
    }

    #[test]
    fn unknown_fields_are_rejected() {
        assert!(matches!(
            ImpactConfig::from_toml_str("[aoi]\nradius = 3.0\n"),
            Err(ImpactError::Parse(_))
        ));
    }

    #[test]
    fn invalid_values_name_their_field() {
        let mut config = ImpactConfig::default();
        config.costs.road = -1.0;
        match config.validate() {
            Err(ImpactError::InvalidConfig { field, .. }) => assert_eq!(field, "costs.road"),
            other => panic!("unexpected: {other:?}"),
        }

        let mut config = ImpactConfig::default();
        config.costs.order = vec![AssetType::Building, AssetType::Building, AssetType::Road];
        assert!(config.validate().is_err());

        let mut config = ImpactConfig::default();
        config.reduction.pixel_budget = 0;
        assert!(config.validate().is_err());

        let mut config = ImpactConfig::default();
        config.aoi.buffer_km = 0.0;
        assert!(config.validate().is_err());
    }

    #[rstest]
    #[case("", "2023-07-15", "dates.pre")]
    #[case("2023-07-01", "", "dates.post")]
    #[case("07/01/2023", "2023-07-15", "dates.pre")]
    #[case("2023-07-15", "2023-07-01", "dates.post")]
    #[case("2023-07-01", "2023-07-01", "dates.post")]
    fn bad_dates_name_their_field(#[case] pre: &str, #[case] post: &str, #[case] expected: &str) {
        let mut config = ImpactConfig::default();
        config.dates = DateConfig { pre: pre.into(), post: post.into() };
        match config.validate() {
            Err(ImpactError::InvalidConfig { field, .. }) => assert_eq!(field, expected),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn default_dates_parse_in_order() {
        let (pre, post) = DateConfig::default().parse().unwrap();
        assert_eq!(pre, NaiveDate::from_ymd_opt(2023, 7, 1).unwrap());
        assert!(post > pre);
    }

    #[test]
    fn zero_cost_is_allowed() {
        let mut config = ImpactConfig::default();
        config.costs.hospital = 0.0;
        config.validate().unwrap();
    }
}
