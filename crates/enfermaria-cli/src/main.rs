//! Enfermaria CLI
//!
//! Command-line front end for recording and exporting occupational-health
//! visits

use clap::{Parser, Subcommand};
use enfermaria_config::AppConfig;
use enfermaria_core::logging_facility::{self, Profile};
use std::path::PathBuf;

mod commands;

#[derive(Debug, Parser)]
#[command(name = "enfermaria")]
#[command(about = "Enfermaria - occupational-health visit recorder", long_about = None)]
struct Cli {
    /// Directory holding enfermaria.toml (defaults to the executable's)
    #[arg(long, global = true)]
    config_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Choose the store file and create its tables
    Init(commands::init::InitArgs),
    /// Record, edit and look up visits
    Visit(commands::visit::VisitArgs),
    /// Write a CSV snapshot of visits
    Export(commands::export::ExportArgs),
    /// Edit the identification option lists
    Options(commands::options::OptionsArgs),
}

fn load_config(dir: Option<PathBuf>) -> Result<AppConfig, Box<dyn std::error::Error>> {
    let config = match dir {
        Some(dir) => AppConfig::load_from(&dir)?,
        None => AppConfig::load()?,
    };
    let profile = config.logging.profile.parse().unwrap_or_else(|e| {
        eprintln!("Warning: {}; using production logging", e);
        Profile::Production
    });
    logging_facility::init(profile);
    Ok(config)
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(cli.config_dir)?;
    match cli.command {
        Commands::Init(args) => commands::init::execute(args, config),
        Commands::Visit(args) => commands::visit::execute(args, config),
        Commands::Export(args) => commands::export::execute(args, config),
        Commands::Options(args) => commands::options::execute(args, config),
    }
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
