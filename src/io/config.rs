//! TOML configuration reading.

use std::path::Path;

use anyhow::{Context, Result};

use crate::config::ImpactConfig;

/// Read a TOML configuration file. Validation happens when the run is described,
/// after command-line overrides are applied.
pub fn read_config(path: &Path) -> Result<ImpactConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("[io::config] Failed to read config file: {}", path.display()))?;
    ImpactConfig::from_toml_str(&text)
        .with_context(|| format!("[io::config] Failed to parse config file: {}", path.display()))
}
