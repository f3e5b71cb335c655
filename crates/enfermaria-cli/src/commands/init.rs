//! Store selection

use clap::Args;
use enfermaria_config::AppConfig;
use enfermaria_engine::Session;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Store file; created if missing
    #[arg(long)]
    pub db: PathBuf,
}

pub fn execute(args: InitArgs, config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let session = Session::start_with_store(config, &args.db)?;
    let report = session.schema_report();

    println!("Store ready: {}", args.db.display());
    for id in &report.applied {
        println!("  applied: {}", id);
    }
    for warning in &report.warnings {
        println!("  warning: {}", warning);
    }
    println!("  config: {}", session.config().file_path().display());
    Ok(())
}
