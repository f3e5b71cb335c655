//! Option-list editing

use super::open_session;
use clap::{Args, Subcommand};
use enfermaria_config::AppConfig;
use enfermaria_core::options::{OptionCategory, OptionSets};

#[derive(Debug, Args)]
pub struct OptionsArgs {
    #[command(subcommand)]
    pub command: OptionsCommand,
}

#[derive(Debug, Subcommand)]
pub enum OptionsCommand {
    /// Print one list, or all of them
    Show {
        #[arg(value_parser = parse_category)]
        category: Option<OptionCategory>,
    },
    Add {
        #[arg(value_parser = parse_category)]
        category: OptionCategory,
        item: String,
    },
    Remove {
        #[arg(value_parser = parse_category)]
        category: OptionCategory,
        item: String,
    },
    /// Re-read the file after an outside edit and print it
    Reload,
}

fn parse_category(raw: &str) -> Result<OptionCategory, String> {
    OptionCategory::from_key(raw).ok_or_else(|| {
        format!("unknown category '{}' (gestores, turnos, setores, processos)", raw)
    })
}

fn print(options: &OptionSets, categories: &[OptionCategory]) {
    for category in categories {
        println!("{}:", category);
        for item in options.sorted(*category) {
            println!("  {}", item);
        }
    }
}

pub fn execute(args: OptionsArgs, config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = open_session(config)?;
    match args.command {
        OptionsCommand::Show { category } => match category {
            Some(category) => print(session.options(), &[category]),
            None => print(session.options(), &OptionCategory::ALL),
        },
        OptionsCommand::Add { category, item } => {
            session.add_option(category, &item)?;
            println!("Added '{}' to {}", item.trim(), category);
        }
        OptionsCommand::Remove { category, item } => {
            session.remove_option(category, &item)?;
            println!("Removed '{}' from {}", item, category);
        }
        OptionsCommand::Reload => {
            let options = session.reload_options().clone();
            print(&options, &OptionCategory::ALL);
        }
    }
    Ok(())
}
