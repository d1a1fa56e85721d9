use serde::Serialize;

use crate::assets::{AffectedAsset, AssetType};

/// One detail row: an affected asset and its estimated loss.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LossRow {
    pub asset_type: AssetType,
    pub latitude: f64,
    pub longitude: f64,
    pub estimated_loss: f64,
}

/// Ordered detail rows. Empty tables are valid and total to zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct LossTable {
    rows: Vec<LossRow>,
}

impl LossTable {
    #[inline] pub fn rows(&self) -> &[LossRow] { &self.rows }

    #[inline] pub fn len(&self) -> usize { self.rows.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.rows.is_empty() }

    /// Sum of the loss column.
    pub fn total(&self) -> f64 {
        self.rows.iter().map(|r| r.estimated_loss).sum()
    }

    /// Concatenate tables, keeping the order they are given in.
    pub fn merge(tables: impl IntoIterator<Item = LossTable>) -> Self {
        Self { rows: tables.into_iter().flat_map(|t| t.rows).collect() }
    }
}

/// Assign the flat `unit_cost` to every affected asset.
///
/// Cost is per asset, independent of footprint size or length. A zero cost
/// is valid and yields zero-loss rows.
pub fn estimate_losses(affected: &[AffectedAsset], unit_cost: f64) -> LossTable {
    LossTable {
        rows: affected.iter()
            .map(|a| LossRow {
                asset_type: a.asset_type,
                latitude: a.latitude,
                longitude: a.longitude,
                estimated_loss: unit_cost,
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn affected(asset_type: AssetType, index: usize) -> AffectedAsset {
        AffectedAsset { asset_type, index, longitude: 85.0 + index as f64, latitude: 27.0 }
    }

    #[test]
    fn every_row_gets_the_unit_cost() {
        let table = estimate_losses(&[affected(AssetType::Building, 0), affected(AssetType::Building, 1)], 500_000.0);
        assert_eq!(table.len(), 2);
        assert!(table.rows().iter().all(|r| r.estimated_loss == 500_000.0));
        assert_eq!(table.total(), 1_000_000.0);
        assert_eq!(table.rows()[1].longitude, 86.0);
    }

    #[test]
    fn empty_input_gives_an_empty_table() {
        let table = estimate_losses(&[], 5_000_000.0);
        assert!(table.is_empty());
        assert_eq!(table.total(), 0.0);
    }

    #[test]
    fn zero_cost_yields_zero_loss_rows() {
        let table = estimate_losses(&[affected(AssetType::Road, 0)], 0.0);
        assert_eq!(table.len(), 1);
        assert_eq!(table.total(), 0.0);
    }

    #[test]
    fn merge_preserves_type_grouping() {
        let buildings = estimate_losses(&[affected(AssetType::Building, 0)], 1.0);
        let roads = estimate_losses(&[affected(AssetType::Road, 0), affected(AssetType::Road, 1)], 2.0);
        let hospitals = estimate_losses(&[affected(AssetType::Hospital, 0)], 3.0);

        let merged = LossTable::merge([buildings, roads, hospitals]);
        let types = merged.rows().iter().map(|r| r.asset_type).collect::<Vec<_>>();
        assert_eq!(types, vec![AssetType::Building, AssetType::Road, AssetType::Road, AssetType::Hospital]);
        assert_eq!(merged.total(), 8.0);
    }

    #[test]
    fn merging_nothing_is_empty_not_absent() {
        let merged = LossTable::merge(Vec::new());
        assert!(merged.is_empty());
        assert_eq!(merged.total(), 0.0);
    }
}
