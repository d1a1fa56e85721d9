pub mod assess;
pub mod mask_area;

use anyhow::{Context, Result};
use floodimpact::{io, ImpactConfig, RasterObservation};

use crate::cli::RunArgs;

/// Load the configuration file (or defaults) and apply command-line overrides.
pub(crate) fn load_config(args: &RunArgs) -> Result<ImpactConfig> {
    let mut config = match &args.config {
        Some(path) => io::read_config(path)?,
        None => ImpactConfig::default(),
    };
    if let Some(lat) = args.lat { config.aoi.lat = lat }
    if let Some(lon) = args.lon { config.aoi.lon = lon }
    if let Some(buffer_km) = args.buffer_km { config.aoi.buffer_km = buffer_km }
    if let Some(threshold) = args.threshold { config.detection.threshold = threshold }
    if let Some(scale) = args.scale { config.reduction.scale_m = scale }
    config.validate().context("invalid configuration")?;
    Ok(config)
}

/// Read the pre- and post-event scenes.
pub(crate) fn load_scenes(args: &RunArgs) -> Result<(Vec<RasterObservation>, Vec<RasterObservation>)> {
    let pre = args.pre.iter().map(|p| io::read_raster(p)).collect::<Result<Vec<_>>>()?;
    let post = args.post.iter().map(|p| io::read_raster(p)).collect::<Result<Vec<_>>>()?;
    tracing::info!(pre = pre.len(), post = post.len(), "loaded scenes");
    Ok((pre, post))
}
