//! Configuration module for pricefit.
//!
//! Settings come from environment variables (a `.env` file is loaded by the
//! binaries), can be overridden by a TOML run file, and finally by command
//! line flags.

mod evaluation_config;
mod source_config;

pub use evaluation_config::EvaluationEnvConfig;
pub use source_config::{SourceEnvConfig, SourceKind};

use crate::domain::split::{SplitPoint, SplitPolicy};
use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    // Source (from SourceEnvConfig)
    pub source: SourceKind,
    pub database_url: String,
    pub dataset: String,
    pub csv_path: PathBuf,
    pub synthetic_days: usize,
    pub synthetic_seed: u64,

    // Evaluation (from EvaluationEnvConfig)
    pub split_point: SplitPoint,
    pub split_policy: SplitPolicy,
    pub series_output: Option<PathBuf>,
    pub report_output: Option<PathBuf>,
}

/// Optional overrides read from a TOML run file. Every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunFile {
    pub source: Option<String>,
    pub database_url: Option<String>,
    pub dataset: Option<String>,
    pub csv_path: Option<PathBuf>,
    pub synthetic_days: Option<usize>,
    pub synthetic_seed: Option<u64>,
    pub split_index: Option<usize>,
    pub train_fraction: Option<f64>,
    pub split_policy: Option<String>,
    pub series_output: Option<PathBuf>,
    pub report_output: Option<PathBuf>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let source = SourceEnvConfig::from_env().context("Failed to load source config")?;
        let evaluation =
            EvaluationEnvConfig::from_env().context("Failed to load evaluation config")?;

        Ok(Self {
            source: source.source,
            database_url: source.database_url,
            dataset: source.dataset,
            csv_path: source.csv_path,
            synthetic_days: source.synthetic_days,
            synthetic_seed: source.synthetic_seed,

            split_point: evaluation.split_point,
            split_policy: evaluation.split_policy,
            series_output: evaluation.series_output,
            report_output: evaluation.report_output,
        })
    }

    pub fn apply_file(&mut self, path: &Path) -> Result<()> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read run file {:?}", path))?;
        let file: RunFile =
            toml::from_str(&text).with_context(|| format!("Failed to parse run file {:?}", path))?;
        self.apply(file)
    }

    pub fn apply(&mut self, file: RunFile) -> Result<()> {
        if file.split_index.is_some() && file.train_fraction.is_some() {
            bail!("Run file sets both split_index and train_fraction; pick one");
        }

        if let Some(source) = file.source {
            self.source = source.parse()?;
        }
        if let Some(url) = file.database_url {
            self.database_url = url;
        }
        if let Some(dataset) = file.dataset {
            self.dataset = dataset;
        }
        if let Some(path) = file.csv_path {
            self.csv_path = path;
        }
        if let Some(days) = file.synthetic_days {
            self.synthetic_days = days;
        }
        if let Some(seed) = file.synthetic_seed {
            self.synthetic_seed = seed;
        }
        if let Some(index) = file.split_index {
            self.split_point = SplitPoint::Index(index);
        }
        if let Some(fraction) = file.train_fraction {
            self.split_point = SplitPoint::Fraction(fraction);
        }
        if let Some(policy) = file.split_policy {
            self.split_policy = policy.parse()?;
        }
        if file.series_output.is_some() {
            self.series_output = file.series_output;
        }
        if file.report_output.is_some() {
            self.report_output = file.report_output;
        }

        Ok(())
    }
}
