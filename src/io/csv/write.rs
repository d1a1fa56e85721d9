//! CSV writing operations.

use std::{fs::File, path::Path};

use anyhow::{Context, Result};
use polars::{frame::DataFrame, io::SerWriter, prelude::{CsvWriter, NamedFrom}, series::Series};

use crate::io::fs::ensure_parent_dir;
use crate::report::ImpactReport;

/// Build the detail table: one row per affected asset.
fn report_frame(report: &ImpactReport) -> Result<DataFrame> {
    let rows = report.rows();
    let types = rows.iter().map(|r| r.asset_type.as_str()).collect::<Vec<_>>();
    let lats = rows.iter().map(|r| r.latitude).collect::<Vec<_>>();
    let lons = rows.iter().map(|r| r.longitude).collect::<Vec<_>>();
    let losses = rows.iter().map(|r| r.estimated_loss).collect::<Vec<_>>();

    DataFrame::new(vec![
        Series::new("Type".into(), types).into(),
        Series::new("Latitude".into(), lats).into(),
        Series::new("Longitude".into(), lons).into(),
        Series::new("Estimated_Loss".into(), losses).into(),
    ])
    .context("[io::csv::write] Failed to build report table")
}

/// Write the report's detail table to a CSV file.
pub fn write_report_csv(report: &ImpactReport, path: &Path) -> Result<()> {
    let mut df = report_frame(report)?;
    ensure_parent_dir(path)?;
    let file = File::create(path)
        .with_context(|| format!("[io::csv::write] Failed to create CSV file: {}", path.display()))?;
    CsvWriter::new(file)
        .finish(&mut df)
        .with_context(|| format!("[io::csv::write] Failed to write CSV to {:?}", path))
}

/// Write the report's detail table to a CSV string.
pub fn report_to_csv_string(report: &ImpactReport) -> Result<String> {
    let mut df = report_frame(report)?;
    let mut buffer = Vec::new();
    CsvWriter::new(&mut buffer)
        .finish(&mut df)
        .with_context(|| "[io::csv::write] Failed to write CSV to string")?;
    String::from_utf8(buffer)
        .with_context(|| "[io::csv::write] CSV output is not valid UTF-8")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{AffectedAsset, AssetType};
    use crate::report::{build_report, estimate_losses, TypeImpact};

    fn report() -> ImpactReport {
        let affected = [AffectedAsset { asset_type: AssetType::Building, index: 0, longitude: 85.3, latitude: 27.5 }];
        build_report(
            1.5,
            vec![TypeImpact {
                asset_type: AssetType::Building,
                assessed: 1,
                undetermined: 0,
                losses: estimate_losses(&affected, 500000.0),
            }],
            &AssetType::ALL,
            "INR",
        )
    }

    #[test]
    fn csv_has_the_export_columns() {
        let csv = report_to_csv_string(&report()).unwrap();
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some("Type,Latitude,Longitude,Estimated_Loss"));
        let row = lines.next().unwrap();
        assert!(row.starts_with("Building,27.5,85.3,"), "row = {row}");
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn empty_report_writes_only_a_header() {
        let empty = build_report(0.0, Vec::new(), &AssetType::ALL, "INR");
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("report.csv");
        write_report_csv(&empty, &path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.trim_end(), "Type,Latitude,Longitude,Estimated_Loss");
    }
}
