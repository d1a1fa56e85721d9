mod cli;
mod commands;

use cli::{Cli, Commands};
use commands::{assess, mask_area};

pub fn run() -> anyhow::Result<()> {
    use clap::Parser;

    let cli = Cli::parse();
    init_tracing(cli.verbose)?;
    match &cli.command {
        Commands::Assess(args) => assess::run(&cli, args),
        Commands::MaskArea(args) => mask_area::run(&cli, args),
    }
}

/// Log to stderr; `FLOODIMPACT_LOG` takes precedence over `-v`.
fn init_tracing(verbose: u8) -> anyhow::Result<()> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("FLOODIMPACT_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}

fn main() -> anyhow::Result<()> { run() }
