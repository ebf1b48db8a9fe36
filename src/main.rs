use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use colored::Colorize;

use med_scrape::config::load_config;
use med_scrape::db::medicine_store::list_medicines;
use med_scrape::db::Database;
use med_scrape::scheduler::build_scheduler;
use med_scrape::scrape_and_store::{extract_medicine_detail, run_scheduled_scrape, run_seed};
use med_scrape::scraping::HttpFetcher;

#[derive(Parser)]
#[command(name = "med_scrape", about = "Medicine catalog scraper", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start the scheduler and crawl on the configured cron cadence
    Run,
    /// Run one crawl-and-store pass over the configured page range
    Crawl,
    /// Seed the store with catalog URLs (append-only, runs once against an empty store)
    Seed,
    /// Extract one medicine detail page without persisting it
    Extract { url: String },
    /// List stored medicine documents
    List {
        #[arg(long, default_value_t = 20)]
        limit: u32,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration settings
    let config = match load_config() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    let db = Database::open(
        Path::new(&config.database.path),
        config.database.busy_timeout_secs,
    )?;

    match cli.command {
        Command::Run => {
            let cron = config.schedule.cron.clone();
            let mut scheduler = build_scheduler(db, Arc::new(config)).await?;
            scheduler.start().await.context("Failed to start scheduler")?;
            println!(
                "{}",
                format!("Scheduler running with cadence '{}', Ctrl-C to stop", cron).green()
            );

            tokio::signal::ctrl_c().await.context("Failed to listen for Ctrl-C")?;

            scheduler.shutdown().await.context("Failed to shut down scheduler")?;
            println!("{}", "Scheduler has been shut down".yellow());
        }
        Command::Crawl => {
            let fetcher = HttpFetcher::new(&config.scraper)?;
            let summary = run_scheduled_scrape(&db, &fetcher, &config).await;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        Command::Seed => {
            let fetcher = HttpFetcher::new(&config.scraper)?;
            let summary = run_seed(&db, &fetcher, &config).await;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        Command::Extract { url } => {
            let fetcher = HttpFetcher::new(&config.scraper)?;
            let record = extract_medicine_detail(&fetcher, &url).await?;
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
        Command::List { limit } => {
            let documents = list_medicines(&db, limit).await?;
            println!("{}", serde_json::to_string_pretty(&documents)?);
        }
    }

    Ok(())
}
