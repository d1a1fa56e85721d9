use std::fmt;

use geo::{BoundingRect, Centroid, Geometry, Point};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Kind of infrastructure an asset geometry represents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AssetType {
    Building,
    Road,
    Hospital,
}

impl AssetType {
    /// Every asset type, in default report order.
    pub const ALL: [AssetType; 3] = [AssetType::Building, AssetType::Road, AssetType::Hospital];

    pub fn as_str(self) -> &'static str {
        match self {
            AssetType::Building => "Building",
            AssetType::Road => "Road",
            AssetType::Hospital => "Hospital",
        }
    }
}

impl fmt::Display for AssetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One vector asset: a footprint (polygon or line) with its type and the
/// attributes it was delivered with.
#[derive(Debug, Clone, PartialEq)]
pub struct AssetGeometry {
    asset_type: AssetType,
    geometry: Geometry<f64>,
    properties: Vec<(String, Value)>,
}

impl AssetGeometry {
    pub fn new(asset_type: AssetType, geometry: impl Into<Geometry<f64>>) -> Self {
        Self { asset_type, geometry: geometry.into(), properties: Vec::new() }
    }

    /// Attach key/value attributes, keeping their order.
    pub fn with_properties(self, properties: Vec<(String, Value)>) -> Self {
        Self { properties, ..self }
    }

    #[inline] pub fn asset_type(&self) -> AssetType { self.asset_type }

    #[inline] pub fn geometry(&self) -> &Geometry<f64> { &self.geometry }

    #[inline] pub fn properties(&self) -> &[(String, Value)] { &self.properties }

    /// Look up an attribute by key.
    pub fn property(&self, key: &str) -> Option<&Value> {
        self.properties.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Centroid of the footprint (lon, lat), falling back to the center of
    /// its bounding box for degenerate shapes.
    pub fn representative_point(&self) -> Option<Point<f64>> {
        self.geometry.centroid()
            .or_else(|| self.geometry.bounding_rect().map(|r| Point::from(r.center())))
            .filter(|p| p.x().is_finite() && p.y().is_finite())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{line_string, polygon};
    use serde_json::json;

    #[test]
    fn polygon_centroid_is_representative() {
        let asset = AssetGeometry::new(
            AssetType::Building,
            polygon![(x: 0.0, y: 0.0), (x: 2.0, y: 0.0), (x: 2.0, y: 2.0), (x: 0.0, y: 2.0), (x: 0.0, y: 0.0)],
        );
        assert_eq!(asset.representative_point(), Some(Point::new(1.0, 1.0)));
    }

    #[test]
    fn line_centroid_is_representative() {
        let asset = AssetGeometry::new(AssetType::Road, line_string![(x: 0.0, y: 0.0), (x: 4.0, y: 0.0)]);
        assert_eq!(asset.representative_point(), Some(Point::new(2.0, 0.0)));
    }

    #[test]
    fn properties_keep_order_and_are_searchable() {
        let asset = AssetGeometry::new(AssetType::Hospital, Point::new(0.0, 0.0))
            .with_properties(vec![("name".into(), json!("General")), ("beds".into(), json!(120))]);
        assert_eq!(asset.property("beds"), Some(&json!(120)));
        assert_eq!(asset.properties()[0].0, "name");
        assert_eq!(asset.property("missing"), None);
    }

    #[test]
    fn display_matches_report_labels() {
        let labels = AssetType::ALL.iter().map(ToString::to_string).collect::<Vec<_>>();
        assert_eq!(labels, ["Building", "Road", "Hospital"]);
    }
}
