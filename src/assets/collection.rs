use geo::{BoundingRect, Intersects, Rect};
use rstar::{primitives::{GeomWithData, Rectangle}, RTree, AABB};

use crate::assets::{AssetGeometry, AssetType};
use crate::error::{ImpactError, Result};
use crate::geom::AreaOfInterest;

/// An ordered set of assets that all share one [`AssetType`]. May be empty.
#[derive(Debug, Clone, PartialEq)]
pub struct AssetCollection {
    asset_type: AssetType,
    assets: Vec<AssetGeometry>,
}

impl AssetCollection {
    /// An empty collection of `asset_type`.
    pub fn empty(asset_type: AssetType) -> Self {
        Self { asset_type, assets: Vec::new() }
    }

    /// Construct a collection, rejecting assets tagged with a different type.
    pub fn new(asset_type: AssetType, assets: Vec<AssetGeometry>) -> Result<Self> {
        if let Some(stray) = assets.iter().find(|a| a.asset_type() != asset_type) {
            return Err(ImpactError::mismatch(format!(
                "{} asset in a {} collection", stray.asset_type(), asset_type
            )));
        }
        Ok(Self { asset_type, assets })
    }

    #[inline] pub fn asset_type(&self) -> AssetType { self.asset_type }

    #[inline] pub fn len(&self) -> usize { self.assets.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.assets.is_empty() }

    #[inline] pub fn assets(&self) -> &[AssetGeometry] { &self.assets }

    #[inline] pub fn iter(&self) -> impl Iterator<Item = &AssetGeometry> { self.assets.iter() }

    /// Keep only assets whose footprint intersects the AOI, preserving order.
    ///
    /// Bounding boxes are screened through an R-tree before the exact test.
    pub fn filter_bounds(&self, aoi: &AreaOfInterest) -> Self {
        let rtree = RTree::bulk_load(
            self.assets.iter().enumerate()
                .filter_map(|(i, asset)| asset.geometry().bounding_rect().map(|r| GeomWithData::new(rectangle(&r), i)))
                .collect()
        );

        let aoi_bounds = aoi.bounds();
        let query = AABB::from_corners(aoi_bounds.min().into(), aoi_bounds.max().into());
        let mut hits = rtree.locate_in_envelope_intersecting(&query)
            .map(|entry| entry.data)
            .filter(|&i| self.assets[i].geometry().intersects(aoi.polygon()))
            .collect::<Vec<_>>();
        hits.sort_unstable();

        tracing::debug!(asset_type = %self.asset_type, kept = hits.len(), total = self.len(), "filtered assets to AOI");
        Self {
            asset_type: self.asset_type,
            assets: hits.into_iter().map(|i| self.assets[i].clone()).collect(),
        }
    }

    /// Keep at most the first `limit` assets.
    pub fn limited(mut self, limit: usize) -> Self {
        self.assets.truncate(limit);
        self
    }
}

/// R-tree rectangle for an asset bounding box.
#[inline]
fn rectangle(rect: &Rect<f64>) -> Rectangle<[f64; 2]> {
    Rectangle::from_corners(rect.min().into(), rect.max().into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{polygon, Point};
    use pretty_assertions::assert_eq;

    fn building(lon: f64, lat: f64) -> AssetGeometry {
        let d = 0.0005;
        AssetGeometry::new(AssetType::Building, polygon![
            (x: lon - d, y: lat - d), (x: lon + d, y: lat - d),
            (x: lon + d, y: lat + d), (x: lon - d, y: lat + d), (x: lon - d, y: lat - d),
        ])
    }

    #[test]
    fn mixed_types_are_rejected() {
        let road = AssetGeometry::new(AssetType::Road, Point::new(0.0, 0.0));
        assert!(AssetCollection::new(AssetType::Building, vec![building(0.0, 0.0), road]).is_err());
    }

    #[test]
    fn filter_bounds_keeps_intersecting_assets_in_order() {
        let aoi = AreaOfInterest::circle(85.3, 27.5, 5_000.0).unwrap();
        let assets = vec![
            building(85.31, 27.5),  // inside
            building(86.0, 27.5),   // far east
            building(85.3, 27.49),  // inside
            building(85.35, 27.545), // inside the bbox, outside the circle
        ];
        let collection = AssetCollection::new(AssetType::Building, assets.clone()).unwrap();
        let filtered = collection.filter_bounds(&aoi);
        assert_eq!(filtered.assets(), &[assets[0].clone(), assets[2].clone()]);
    }

    #[test]
    fn limited_truncates_without_reordering() {
        let assets = vec![building(0.0, 0.0), building(1.0, 0.0), building(2.0, 0.0)];
        let collection = AssetCollection::new(AssetType::Building, assets.clone()).unwrap().limited(2);
        assert_eq!(collection.assets(), &assets[..2]);
    }
}
