use anyhow::Result;
use clap::Parser;
use wo_tracker::cli::{Command, RootArgs};
use wo_tracker::{logging, AppConfig};

fn main() -> Result<()> {
    let args = RootArgs::parse();
    logging::init();

    let config = AppConfig::load(&args.config)?;
    let today = chrono::Local::now().date_naive();

    match args.command {
        Command::Update(date) => {
            let result = wo_tracker::run_update(&config, date.resolve(today))?;
            tracing::info!(
                "品質 {} 列，完工 {} 列，在製品 {} 列",
                result.quality.len(),
                result.yields.len(),
                result.wip.len()
            );
        }
        Command::Journal(date) => {
            wo_tracker::run_journal(&config, date.resolve(today))?;
        }
    }

    Ok(())
}
