//! pricefit - fit a zero-intercept linear model to a daily close series
//!
//! Pulls closes from the configured source, engineers `day_prev_close` and
//! `trend_3_day`, splits by row index, fits and prints RMSE and R².
//!
//! # Usage
//! ```sh
//! PRICE_SOURCE=sqlite DATASET=SPY cargo run -- --split-index 400
//! ```

use anyhow::Result;
use clap::Parser;
use pricefit::application::workflow::{EvaluationReport, RegressionWorkflow};
use pricefit::config::{Config, SourceKind};
use pricefit::domain::split::{SplitPoint, SplitPolicy};
use pricefit::infrastructure::ServiceFactory;
use std::path::PathBuf;
use tracing::{Level, info};
use tracing_subscriber::prelude::*;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// TOML run file; overrides environment settings
    #[arg(long)]
    config: Option<PathBuf>,

    /// Price source: sqlite, csv or synthetic
    #[arg(long)]
    source: Option<SourceKind>,

    /// Dataset (ticker) to load
    #[arg(long)]
    dataset: Option<String>,

    /// Rows before this index train the model
    #[arg(long, conflicts_with = "train_fraction")]
    split_index: Option<usize>,

    /// Share of rows used for training, in (0, 1)
    #[arg(long)]
    train_fraction: Option<f64>,

    /// exclusive (default) or inclusive; inclusive puts the boundary row in both sets
    #[arg(long)]
    split_policy: Option<SplitPolicy>,

    /// Write the engineered series and predictions as CSV
    #[arg(long)]
    series_output: Option<PathBuf>,

    /// Write the evaluation report as JSON
    #[arg(long)]
    report_output: Option<PathBuf>,
}

impl Args {
    fn apply(self, config: &mut Config) {
        if let Some(source) = self.source {
            config.source = source;
        }
        if let Some(dataset) = self.dataset {
            config.dataset = dataset;
        }
        if let Some(index) = self.split_index {
            config.split_point = SplitPoint::Index(index);
        }
        if let Some(fraction) = self.train_fraction {
            config.split_point = SplitPoint::Fraction(fraction);
        }
        if let Some(policy) = self.split_policy {
            config.split_policy = policy;
        }
        if self.series_output.is_some() {
            config.series_output = self.series_output;
        }
        if self.report_output.is_some() {
            config.report_output = self.report_output;
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let stdout_layer = tracing_subscriber::fmt::layer().with_target(false).pretty();
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with(stdout_layer)
        .init();

    let args = Args::parse();
    let mut config = Config::from_env()?;
    if let Some(path) = &args.config {
        config.apply_file(path)?;
    }
    args.apply(&mut config);
    info!(
        "Configuration loaded: Source={:?}, Dataset={}, Split={:?} ({:?})",
        config.source, config.dataset, config.split_point, config.split_policy
    );

    let source = ServiceFactory::create_price_source(&config).await?;
    let mut sinks = ServiceFactory::create_sinks(&config);
    let workflow = RegressionWorkflow::new(config.split_point, config.split_policy);

    let outcome = workflow
        .run(source.as_ref(), &config.dataset, &mut sinks)
        .await?;
    let report = &outcome.report;

    print_report(report);

    if let Some(path) = &config.report_output {
        report.save_json(path)?;
    }

    Ok(())
}

const RULE: &str = "══════════════════════════════════════════════════════";

fn print_report(report: &EvaluationReport) {
    println!("\n{}", RULE);
    println!(
        "  {} ({} rows, train {} / test {})",
        report.dataset, report.engineered_rows, report.n_train, report.n_test
    );
    println!("{}", RULE);
    for c in &report.coefficients {
        println!("  {:<16} {:>12.6}", c.feature, c.value);
    }
    println!("  RMSE: {:.4}", report.rmse);
    println!("  R²:   {:.4}", report.r2);
    println!("  MAE:  {:.4}", report.mae);
    println!("{}\n", RULE);
}
