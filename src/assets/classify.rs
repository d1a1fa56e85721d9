use geo::Point;
use rayon::prelude::*;
use serde::Serialize;

use crate::assets::{AssetCollection, AssetType};
use crate::zonal::{reduce_over_geometry, ReduceParams, Reducer, Reduction, SampledField, UndeterminedReason};

/// Per-asset outcome of overlaying the change mask on its footprint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ZonalResult {
    Flagged,
    Unflagged,
    Undetermined(UndeterminedReason),
}

impl ZonalResult {
    /// Only an exact `1` classifies as flagged.
    pub fn from_reduction(reduction: Reduction) -> Self {
        match reduction {
            Reduction::Value(v) if v == 1.0 => ZonalResult::Flagged,
            Reduction::Value(_) => ZonalResult::Unflagged,
            Reduction::Undetermined(reason) => ZonalResult::Undetermined(reason),
        }
    }
}

/// A flagged asset and its representative coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AffectedAsset {
    pub asset_type: AssetType,
    /// Position of the asset in its input collection.
    pub index: usize,
    pub longitude: f64,
    pub latitude: f64,
}

impl AffectedAsset {
    #[inline] pub fn point(&self) -> Point<f64> { Point::new(self.longitude, self.latitude) }
}

/// Classification of one asset collection.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    asset_type: AssetType,
    results: Vec<ZonalResult>,
    affected: Vec<AffectedAsset>,
}

impl Classification {
    fn empty(asset_type: AssetType) -> Self {
        Self { asset_type, results: Vec::new(), affected: Vec::new() }
    }

    #[inline] pub fn asset_type(&self) -> AssetType { self.asset_type }

    /// Per-asset results, in input order.
    #[inline] pub fn results(&self) -> &[ZonalResult] { &self.results }

    /// Flagged assets, in input order.
    #[inline] pub fn affected(&self) -> &[AffectedAsset] { &self.affected }

    /// Number of flagged assets.
    #[inline] pub fn count(&self) -> usize { self.affected.len() }

    /// Number of assets that could not be classified.
    pub fn undetermined(&self) -> usize {
        self.results.iter().filter(|r| matches!(r, ZonalResult::Undetermined(_))).count()
    }

    /// Number of undetermined assets with the given reason.
    pub fn undetermined_for(&self, reason: UndeterminedReason) -> usize {
        self.results.iter().filter(|r| **r == ZonalResult::Undetermined(reason)).count()
    }
}

/// Classify every asset in `assets` against `mask` with a `Max` reduction.
///
/// Reductions run in parallel on the current rayon pool; output order follows
/// input order. An empty collection returns immediately without reducing.
pub fn classify<F>(assets: &AssetCollection, mask: &F, params: &ReduceParams) -> Classification
where
    F: SampledField + ?Sized,
{
    let asset_type = assets.asset_type();
    if assets.is_empty() {
        tracing::debug!(%asset_type, "no assets to classify");
        return Classification::empty(asset_type);
    }

    let outcomes = assets.assets().par_iter()
        .map(|asset| {
            let result = ZonalResult::from_reduction(
                reduce_over_geometry(mask, asset.geometry(), Reducer::Max, params)
            );
            match result {
                ZonalResult::Flagged => match asset.representative_point() {
                    Some(p) => (result, Some(p)),
                    None => (ZonalResult::Undetermined(UndeterminedReason::InvalidGeometry), None),
                },
                _ => (result, None),
            }
        })
        .collect::<Vec<_>>();

    let affected = outcomes.iter().enumerate()
        .filter_map(|(index, (_, point))| point.map(|p| AffectedAsset {
            asset_type,
            index,
            longitude: p.x(),
            latitude: p.y(),
        }))
        .collect::<Vec<_>>();
    let results = outcomes.into_iter().map(|(r, _)| r).collect::<Vec<_>>();

    let classification = Classification { asset_type, results, affected };
    let timed_out = classification.undetermined_for(UndeterminedReason::TimedOut);
    let over_budget = classification.undetermined_for(UndeterminedReason::BudgetExceeded);
    if timed_out + over_budget > 0 {
        tracing::warn!(%asset_type, timed_out, over_budget, "some assets could not be classified");
    }
    tracing::info!(
        %asset_type,
        total = assets.len(),
        flagged = classification.count(),
        undetermined = classification.undetermined(),
        "classified assets"
    );
    classification
}
