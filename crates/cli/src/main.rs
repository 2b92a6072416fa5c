mod cli;
mod logging;
mod output;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use playtime_core::ReportsConfig;
use playtime_core::db::Database;
use playtime_core::domain::StatisticsService;
use playtime_core::reports::{Navigator, Page, Paginated, Reports};
use tracing::{error, info};

use crate::cli::{Cli, Commands};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    logging::init(&cli.log_level);

    if let Err(e) = run(cli).await {
        error!(error = %e, "report failed");
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let db = Database::open(&cli.db)
        .with_context(|| format!("failed to open {}", cli.db.display()))?;
    let reports = Reports::new(Arc::new(StatisticsService::new(Arc::new(db))))
        .with_config(ReportsConfig::default().with_week_start(cli.week_start));

    info!(command = ?cli.command, "building report");

    match cli.command {
        Commands::Weekly(arg) => {
            let page = step_back(reports.weekly_statistics().await?, arg.back).await?;
            println!("{}", output::daily(&page)?);
        }
        Commands::Monthly(arg) => {
            let page = step_back(reports.monthly_statistics().await?, arg.back).await?;
            println!("{}", output::daily(&page)?);
        }
        Commands::Yearly { game_id, back } => {
            let page = step_back(reports.yearly_statistics(&game_id).await?, back.back).await?;
            println!("{}", output::yearly(&page)?);
        }
        Commands::Overall => {
            let games = reports.overall_statistics().await?;
            println!("{}", output::overall(&games)?);
        }
    }

    Ok(())
}

/// Walk `back` pages into the past, stopping at the oldest page with data.
async fn step_back<T>(first: Paginated<T>, back: u32) -> Result<Page<T>>
where
    T: Clone + Send + Sync + 'static,
{
    let navigator = Navigator::new(first);

    for _ in 0..back {
        if navigator.prev().await?.is_none() {
            info!("no older data");
            break;
        }
    }

    Ok(navigator.current().current().clone())
}
