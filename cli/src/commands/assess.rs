use std::path::PathBuf;

use anyhow::Result;
use floodimpact::{io, Assessment, AssessmentInputs, AssetType};

use crate::commands::{load_config, load_scenes};

pub fn run(_cli: &crate::cli::Cli, args: &crate::cli::AssessArgs) -> Result<()> {
    let out_path = args.output.clone().unwrap_or_else(|| PathBuf::from("./flood_damage_report.csv"));

    let config = load_config(&args.run)?;
    let (pre, post) = load_scenes(&args.run)?;

    let mut inputs = AssessmentInputs::new(pre, post);
    let layers = [
        (AssetType::Building, &args.buildings),
        (AssetType::Road, &args.roads),
        (AssetType::Hospital, &args.hospitals),
    ];
    for (asset_type, path) in layers {
        if let Some(path) = path {
            println!("[assess] loading {} from {}", asset_type, path.display());
            inputs = inputs.with_assets(io::read_assets(path, asset_type)?);
        }
    }

    let assessment = Assessment::describe(&config, inputs)?;
    println!("[assess] observations {} to {}, threshold {} dB",
        config.dates.pre, config.dates.post, config.detection.threshold);
    let report = assessment.run()?;

    println!("[assess] flooded area: {:.2} km²", report.flooded_area_km2());
    for summary in report.summaries() {
        println!("[assess] {}: {} affected of {} assessed ({} undetermined), loss {:.2} {}",
            summary.asset_type, summary.affected, summary.assessed, summary.undetermined,
            summary.loss, report.currency());
    }
    println!("[assess] total estimated loss: {:.2} {}", report.total_loss(), report.currency());

    println!("[assess] writing loss table to {}", out_path.display());
    io::write_report_csv(&report, &out_path)?;
    if let Some(json_path) = &args.json {
        println!("[assess] writing report to {}", json_path.display());
        io::write_report_json(&report, json_path)?;
    }

    Ok(())
}
