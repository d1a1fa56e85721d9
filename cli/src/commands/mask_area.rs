use anyhow::Result;
use floodimpact::{detect_change, total_flooded_area_km2, RasterObservation};

use crate::commands::{load_config, load_scenes};

pub fn run(_cli: &crate::cli::Cli, args: &crate::cli::MaskAreaArgs) -> Result<()> {
    let config = load_config(&args.run)?;
    let (pre, post) = load_scenes(&args.run)?;

    let pre = RasterObservation::mean_composite(&pre)?;
    let post = RasterObservation::mean_composite(&post)?;
    let mask = detect_change(&pre, &post, config.detection.threshold)?;

    let aoi = config.aoi()?;
    let area_km2 = total_flooded_area_km2(&mask, &aoi, &config.reduce_params()?)?;

    println!("[mask-area] flagged cells: {} of {} defined", mask.flagged_count(), mask.defined_count());
    println!("[mask-area] flooded area within {} km of ({}, {}): {:.2} km²",
        config.aoi.buffer_km, config.aoi.lat, config.aoi.lon, area_km2);

    Ok(())
}
