//! GeoJSON reading operations.

use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use geo::{Coord, Geometry, LineString, MultiLineString, MultiPoint, MultiPolygon, Point, Polygon};
use serde_json::Value;

use crate::assets::{AssetCollection, AssetGeometry, AssetType};

/// Read a GeoJSON FeatureCollection file into an asset collection of `asset_type`.
pub fn read_assets(path: &Path, asset_type: AssetType) -> Result<AssetCollection> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("[io::geojson::read] Failed to open GeoJSON file: {}", path.display()))?;
    parse_assets(&text, asset_type)
        .with_context(|| format!("[io::geojson::read] Failed to read assets from {}", path.display()))
}

/// Parse a GeoJSON FeatureCollection into an asset collection of `asset_type`.
///
/// Features with a null or unsupported geometry are skipped; malformed
/// coordinates are an error.
pub fn parse_assets(text: &str, asset_type: AssetType) -> Result<AssetCollection> {
    let value: Value = serde_json::from_str(text).context("[io::geojson::read] Failed to parse GeoJSON")?;
    if value["type"].as_str() != Some("FeatureCollection") {
        bail!("[io::geojson::read] Expected a FeatureCollection");
    }
    let features = value["features"].as_array()
        .ok_or_else(|| anyhow!("[io::geojson::read] FeatureCollection has no features array"))?;

    let mut assets = Vec::with_capacity(features.len());
    for (i, feature) in features.iter().enumerate() {
        let Some(geometry) = feature.get("geometry").filter(|g| !g.is_null()) else {
            tracing::warn!(feature = i, "skipping feature without geometry");
            continue;
        };
        let Some(geometry) = parse_geometry(geometry).with_context(|| format!("feature {i}"))? else {
            tracing::warn!(feature = i, kind = geometry["type"].as_str().unwrap_or("?"), "skipping unsupported geometry");
            continue;
        };

        let properties = feature["properties"].as_object()
            .map(|props| props.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
            .unwrap_or_default();
        assets.push(AssetGeometry::new(asset_type, geometry).with_properties(properties));
    }

    tracing::debug!(%asset_type, features = features.len(), assets = assets.len(), "parsed GeoJSON assets");
    Ok(AssetCollection::new(asset_type, assets)?)
}

/// Parse a GeoJSON geometry object; `None` for types assets cannot have.
fn parse_geometry(geometry: &Value) -> Result<Option<Geometry<f64>>> {
    let coords = &geometry["coordinates"];
    let parsed = match geometry["type"].as_str() {
        Some("Point") => Geometry::Point(Point(parse_coord(coords)?)),
        Some("MultiPoint") => Geometry::MultiPoint(MultiPoint(
            array(coords)?.iter().map(|c| parse_coord(c).map(Point)).collect::<Result<_>>()?
        )),
        Some("LineString") => Geometry::LineString(parse_line(coords)?),
        Some("MultiLineString") => Geometry::MultiLineString(MultiLineString(
            array(coords)?.iter().map(parse_line).collect::<Result<_>>()?
        )),
        Some("Polygon") => Geometry::Polygon(parse_polygon(coords)?),
        Some("MultiPolygon") => Geometry::MultiPolygon(MultiPolygon(
            array(coords)?.iter().map(parse_polygon).collect::<Result<_>>()?
        )),
        _ => return Ok(None),
    };
    Ok(Some(parsed))
}

fn array(value: &Value) -> Result<&Vec<Value>> {
    value.as_array().ok_or_else(|| anyhow!("Invalid coordinates: expected an array"))
}

/// Parse a position: [x, y, ...]
fn parse_coord(value: &Value) -> Result<Coord<f64>> {
    let pair = array(value)?;
    if pair.len() < 2 {
        bail!("Invalid coordinate: expected at least two numbers");
    }
    let x = pair[0].as_f64().ok_or_else(|| anyhow!("Invalid coordinate: x must be a number"))?;
    let y = pair[1].as_f64().ok_or_else(|| anyhow!("Invalid coordinate: y must be a number"))?;
    Ok(Coord { x, y })
}

fn parse_line(value: &Value) -> Result<LineString<f64>> {
    Ok(LineString(array(value)?.iter().map(parse_coord).collect::<Result<_>>()?))
}

/// Parse polygon rings: [exterior, hole, hole, ...]. Rings are closed if needed.
fn parse_polygon(value: &Value) -> Result<Polygon<f64>> {
    let mut rings = array(value)?.iter().map(parse_line);
    let exterior = rings.next()
        .ok_or_else(|| anyhow!("Invalid Polygon: missing exterior ring"))??;
    let interiors = rings.collect::<Result<Vec<_>>>()?;
    // Polygon::new closes open rings.
    Ok(Polygon::new(exterior, interiors))
}
