use clap::{Parser, Subcommand};
use tracing::Level;

mod commands;
mod inputs;

use commands::extract::ExtractArgs;
use commands::scan::ScanArgs;

#[derive(Parser)]
#[command(name = "opuspak-cli")]
#[command(about = "Extracts WEM and Ogg Opus streams from opuspak archives", long_about = None)]
struct Cli {
    /// Turn on verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract every embedded stream (WEM, or Ogg Opus with --opus)
    Extract(ExtractArgs),
    /// List the embedded streams without extracting
    Scan(ScanArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::INFO })
        .with_target(false)
        .without_time()
        .init();

    match cli.command {
        Commands::Extract(args) => commands::extract::handle(args)?,
        Commands::Scan(args) => commands::scan::handle(args)?,
    }

    Ok(())
}
