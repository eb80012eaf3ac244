//! Runs the regression workflow and plots the result in a native window.
//!
//! Reads the same environment settings as `pricefit`.

use anyhow::Result;
use clap::Parser;
use pricefit::application::workflow::RegressionWorkflow;
use pricefit::config::Config;
use pricefit::domain::ports::SeriesSink;
use pricefit::infrastructure::ServiceFactory;
use pricefit::interfaces::ChartWindow;
use std::path::PathBuf;
use tracing::{Level, info};
use tracing_subscriber::prelude::*;

#[derive(Parser, Debug)]
#[command(author, version, about = "Plot closes, trend signs and predictions", long_about = None)]
struct Args {
    /// TOML run file; overrides environment settings
    #[arg(long)]
    config: Option<PathBuf>,

    /// Dataset (ticker) to load
    #[arg(long)]
    dataset: Option<String>,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let args = Args::parse();
    let mut config = Config::from_env()?;
    if let Some(path) = &args.config {
        config.apply_file(path)?;
    }
    if let Some(dataset) = args.dataset {
        config.dataset = dataset;
    }

    // The UI owns the main thread, so the fetch runs on a short-lived runtime first
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let outcome = rt.block_on(async {
        let source = ServiceFactory::create_price_source(&config).await?;
        let mut sinks = ServiceFactory::create_sinks(&config);
        RegressionWorkflow::new(config.split_point, config.split_policy)
            .run(source.as_ref(), &config.dataset, &mut sinks)
            .await
    })?;
    info!(
        "RMSE {:.4}, R² {:.4}; opening chart",
        outcome.report.rmse, outcome.report.r2
    );

    let mut window = ChartWindow::new(format!("pricefit - {}", config.dataset))
        .with_report(&outcome.report);
    window.render(&outcome.chart)?;
    window.show()
}
