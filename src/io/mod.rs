//! IO module for the formats exchanged with external collaborators.
//!
//! Each format module handles reading and/or writing for one file format.
//!
//! # Format Modules
//!
//! - `csv` - CSV detail table of an impact report
//! - `geojson` - GeoJSON FeatureCollections of asset geometries
//! - `json` - JSON rasters and JSON impact summaries
//! - `config` - TOML run configuration

mod config;
mod csv;
mod fs;
mod geojson;
mod json;

pub use config::read_config;
pub use csv::{report_to_csv_string, write_report_csv};
pub use geojson::{parse_assets, read_assets};
pub use json::{parse_raster, read_raster, raster_to_json_string, write_report_json};
