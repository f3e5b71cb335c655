//! CSV export command

use super::open_session;
use chrono::{Local, NaiveDate};
use clap::Args;
use enfermaria_config::AppConfig;
use enfermaria_engine::{EngineCommand, EngineCommandResult};
use enfermaria_store::ExportFilter;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct ExportArgs {
    /// Destination file
    #[arg(long)]
    pub out: PathBuf,

    /// First day (YYYY-MM-DD), used with --to
    #[arg(long, requires = "to", conflicts_with_all = ["week", "all"])]
    pub from: Option<NaiveDate>,

    /// Last day (YYYY-MM-DD), used with --from
    #[arg(long, requires = "from")]
    pub to: Option<NaiveDate>,

    /// ISO week number
    #[arg(long, conflicts_with = "all", value_parser = clap::value_parser!(u32).range(1..=53))]
    pub week: Option<u32>,

    /// Every visit in the store
    #[arg(long)]
    pub all: bool,
}

impl ExportArgs {
    /// Without a filter flag only today's visits are exported
    fn filter(&self, today: NaiveDate) -> ExportFilter {
        match (self.from, self.to, self.week) {
            (Some(start), Some(end), _) => ExportFilter::DateRange { start, end },
            (_, _, Some(week)) => ExportFilter::IsoWeek(week),
            _ if self.all => ExportFilter::All,
            _ => ExportFilter::today(today),
        }
    }
}

pub fn execute(args: ExportArgs, config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = open_session(config)?;
    let filter = args.filter(Local::now().date_naive());

    match session.execute(EngineCommand::Export {
        path: args.out.clone(),
        filter,
    })? {
        EngineCommandResult::Exported(summary) => {
            println!("Export written: {}", args.out.display());
            println!("  visits: {}", summary.visits);
            println!("  rows: {}", summary.rows);
            Ok(())
        }
        other => Err(format!("Unexpected engine result: {:?}", other).into()),
    }
}
