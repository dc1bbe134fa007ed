//! SectorLoc CLI - Command-line interface for mod translation

pub mod commands;
pub mod progress;

use clap::Parser;
use commands::Commands;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sectorloc")]
#[command(about = "SectorLoc: translation tools for Starsector mods", version, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Run the SectorLoc CLI
///
/// # Errors
/// Returns an error if the selected command fails.
pub fn run_cli() -> anyhow::Result<()> {
    // Setup logging, quiet unless RUST_LOG says otherwise
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    cli.command.execute()?;

    Ok(())
}
