//! Warehouse loader
//!
//! Loads daily closes into the SQLite table the `pricefit` binary reads from.

use anyhow::{Result, bail};
use clap::{Parser, Subcommand};
use pricefit::domain::features::prepare_series;
use pricefit::domain::ports::PriceSource;
use pricefit::infrastructure::{CsvPriceSource, SqlitePriceSource, SyntheticPriceSource};
use std::path::PathBuf;
use tracing::{Level, info};
use tracing_subscriber::prelude::*;

#[derive(Parser)]
#[command(author, version, about = "Load daily closes into the SQLite warehouse", long_about = None)]
struct Cli {
    /// SQLite database URL
    #[arg(long, default_value = "sqlite://data/prices.db")]
    database_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import a `date,close` CSV file
    Csv {
        /// Dataset name to store the rows under
        #[arg(short, long)]
        dataset: String,

        /// CSV file with `date,close` header
        #[arg(short, long)]
        input: PathBuf,
    },
    /// Store a seeded random walk
    Synthetic {
        #[arg(short, long, default_value = "SYNTH")]
        dataset: String,

        #[arg(long, default_value_t = 500)]
        days: usize,

        #[arg(long, default_value_t = 42)]
        seed: u64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let cli = Cli::parse();

    let (dataset, records) = match cli.command {
        Commands::Csv { dataset, input } => {
            let records = CsvPriceSource::new(input).fetch_closes(&dataset).await?;
            (dataset, records)
        }
        Commands::Synthetic {
            dataset,
            days,
            seed,
        } => {
            let records = SyntheticPriceSource::new(days, seed)
                .fetch_closes(&dataset)
                .await?;
            (dataset, records)
        }
    };

    if records.is_empty() {
        bail!("Nothing to import for {}", dataset);
    }
    // Reject duplicates and bad closes before they reach the warehouse
    let records = prepare_series(records)?;

    let warehouse = SqlitePriceSource::connect(&cli.database_url).await?;
    let written = warehouse.insert_closes(&dataset, &records).await?;
    info!(
        "Imported {} closes for {} ({} .. {})",
        written,
        dataset,
        records[0].date,
        records[records.len() - 1].date
    );

    Ok(())
}
