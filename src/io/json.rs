//! JSON rasters and impact summaries.
//!
//! A raster document carries its grid inline with the values, row-major from
//! the north-west corner. `null` cells and cells equal to `nodata` are read
//! as missing data:
//!
//! ```json
//! { "west": 85.2, "north": 27.6, "cell_width_deg": 0.001, "cell_height_deg": 0.001,
//!   "rows": 2, "cols": 2, "nodata": -9999, "values": [[-10.0, -11.2], [null, -9999]] }
//! ```

use std::{fs::File, io::BufWriter, path::Path};

use anyhow::{bail, Context, Result};
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::io::fs::ensure_parent_dir;
use crate::raster::{GridSpec, RasterObservation};
use crate::report::ImpactReport;

#[derive(Debug, Serialize, Deserialize)]
struct RasterDocument {
    #[serde(flatten)]
    grid: GridSpec,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    nodata: Option<f64>,
    values: Vec<Vec<Option<f64>>>,
}

/// Read a JSON raster file.
pub fn read_raster(path: &Path) -> Result<RasterObservation> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("[io::json] Failed to open raster file: {}", path.display()))?;
    parse_raster(&text)
        .with_context(|| format!("[io::json] Failed to read raster from {}", path.display()))
}

/// Parse a JSON raster document.
pub fn parse_raster(text: &str) -> Result<RasterObservation> {
    let doc: RasterDocument = serde_json::from_str(text).context("[io::json] Failed to parse raster JSON")?;
    let (rows, cols) = doc.grid.shape();
    if doc.values.len() != rows {
        bail!("[io::json] Raster declares {rows} rows but has {}", doc.values.len());
    }
    if let Some((i, row)) = doc.values.iter().enumerate().find(|(_, row)| row.len() != cols) {
        bail!("[io::json] Raster row {i} has {} values, expected {cols}", row.len());
    }

    let flat = doc.values.into_iter().flatten()
        .map(|v| match (v, doc.nodata) {
            (Some(v), Some(nodata)) if v == nodata => f64::NAN,
            (Some(v), _) => v,
            (None, _) => f64::NAN,
        })
        .collect::<Vec<_>>();
    let values = Array2::from_shape_vec((rows, cols), flat).context("[io::json] Raster values do not fit the grid")?;
    Ok(RasterObservation::new(doc.grid, values)?)
}

/// Serialize a raster to a JSON document; missing cells become `null`.
pub fn raster_to_json_string(raster: &RasterObservation) -> Result<String> {
    let doc = RasterDocument {
        grid: *raster.grid(),
        nodata: None,
        values: raster.values().rows().into_iter()
            .map(|row| row.iter().map(|&v| (!v.is_nan()).then_some(v)).collect())
            .collect(),
    };
    serde_json::to_string(&doc).context("[io::json] Failed to serialize raster")
}

/// Write the full report (summaries, rows, totals) as pretty-printed JSON.
pub fn write_report_json(report: &ImpactReport, path: &Path) -> Result<()> {
    ensure_parent_dir(path)?;
    let file = File::create(path)
        .with_context(|| format!("[io::json] Failed to create report file: {}", path.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(file), report)
        .with_context(|| format!("[io::json] Failed to write report to {:?}", path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::AssetType;
    use crate::report::build_report;

    #[test]
    fn nulls_and_nodata_become_missing() {
        let raster = parse_raster(r#"{
            "west": 85.2, "north": 27.6, "cell_width_deg": 0.001, "cell_height_deg": 0.001,
            "rows": 2, "cols": 2, "nodata": -9999,
            "values": [[-10.0, -11.5], [null, -9999]]
        }"#).unwrap();

        assert_eq!(raster.grid().shape(), (2, 2));
        assert_eq!(raster.values()[[0, 1]], -11.5);
        assert!(raster.values()[[1, 0]].is_nan());
        assert!(raster.values()[[1, 1]].is_nan());
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let ragged = r#"{"west": 0, "north": 0, "cell_width_deg": 1, "cell_height_deg": 1,
            "rows": 2, "cols": 2, "values": [[1, 2], [3]]}"#;
        assert!(parse_raster(ragged).is_err());
    }

    #[test]
    fn raster_survives_a_file_round_trip() {
        let raster = parse_raster(r#"{"west": 1, "north": 2, "cell_width_deg": 0.5, "cell_height_deg": 0.5,
            "rows": 1, "cols": 3, "values": [[-10.0, null, -7.25]]}"#).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pre.json");
        std::fs::write(&path, raster_to_json_string(&raster).unwrap()).unwrap();
        let back = read_raster(&path).unwrap();

        assert_eq!(back.grid(), raster.grid());
        assert_eq!(back.values()[[0, 0]], -10.0);
        assert!(back.values()[[0, 1]].is_nan());
        assert_eq!(back.values()[[0, 2]], -7.25);
    }

    #[test]
    fn report_json_carries_totals() {
        let report = build_report(2.5, Vec::new(), &AssetType::ALL, "INR");
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        write_report_json(&report, &path).unwrap();

        let value: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["flooded_area_km2"], 2.5);
        assert_eq!(value["total_loss"], 0.0);
        assert_eq!(value["currency"], "INR");
        assert_eq!(value["summaries"].as_array().map(Vec::len), Some(3));
    }
}
