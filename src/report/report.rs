use serde::Serialize;

use crate::assets::AssetType;
use crate::report::{LossRow, LossTable};

/// Classification and loss outcome for one asset type, as fed to [`build_report`].
#[derive(Debug, Clone, PartialEq)]
pub struct TypeImpact {
    pub asset_type: AssetType,
    /// Number of assets reduced (after AOI filtering and limits).
    pub assessed: usize,
    /// Number of assets that could not be classified.
    pub undetermined: usize,
    pub losses: LossTable,
}

/// Per-type counts in an [`ImpactReport`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TypeSummary {
    pub asset_type: AssetType,
    pub assessed: usize,
    pub affected: usize,
    pub undetermined: usize,
    pub loss: f64,
}

/// Result of one assessment run. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImpactReport {
    flooded_area_km2: f64,
    summaries: Vec<TypeSummary>,
    rows: Vec<LossRow>,
    total_loss: f64,
    currency: String,
}

impl ImpactReport {
    /// Flagged ground area inside the AOI, in km².
    #[inline] pub fn flooded_area_km2(&self) -> f64 { self.flooded_area_km2 }

    /// One summary per asset type, in report order.
    #[inline] pub fn summaries(&self) -> &[TypeSummary] { &self.summaries }

    /// Detail rows, grouped by type in report order.
    #[inline] pub fn rows(&self) -> &[LossRow] { &self.rows }

    #[inline] pub fn total_loss(&self) -> f64 { self.total_loss }

    #[inline] pub fn currency(&self) -> &str { &self.currency }

    /// Affected count for `asset_type`; zero when the type was not assessed.
    pub fn count(&self, asset_type: AssetType) -> usize {
        self.summary(asset_type).map_or(0, |s| s.affected)
    }

    pub fn summary(&self, asset_type: AssetType) -> Option<&TypeSummary> {
        self.summaries.iter().find(|s| s.asset_type == asset_type)
    }
}

/// Assemble a report, ordering types by `order`.
///
/// Types listed in `order` but missing from `per_type` are reported with zero
/// counts; types missing from `order` follow in [`AssetType`] order. Counts and
/// the total are derived from the loss tables, so they always agree with the
/// detail rows.
pub fn build_report(area_km2: f64, mut per_type: Vec<TypeImpact>, order: &[AssetType], currency: &str) -> ImpactReport {
    let rank = |t: AssetType| order.iter().position(|&o| o == t).unwrap_or(order.len() + t as usize);
    per_type.sort_by_key(|impact| rank(impact.asset_type));

    let mut summaries = order.iter()
        .filter(|t| !per_type.iter().any(|i| i.asset_type == **t))
        .map(|&asset_type| TypeSummary { asset_type, assessed: 0, affected: 0, undetermined: 0, loss: 0.0 })
        .chain(per_type.iter().map(|impact| TypeSummary {
            asset_type: impact.asset_type,
            assessed: impact.assessed,
            affected: impact.losses.len(),
            undetermined: impact.undetermined,
            loss: impact.losses.total(),
        }))
        .collect::<Vec<_>>();
    summaries.sort_by_key(|s| rank(s.asset_type));

    let table = LossTable::merge(per_type.into_iter().map(|impact| impact.losses));
    let total_loss = table.total();

    ImpactReport {
        flooded_area_km2: area_km2,
        summaries,
        rows: table.rows().to_vec(),
        total_loss,
        currency: currency.to_string(),
    }
}
