//! Train/test split and output configuration parsing from environment variables.

use crate::domain::split::{SplitPoint, SplitPolicy};
use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct EvaluationEnvConfig {
    pub split_point: SplitPoint,
    pub split_policy: SplitPolicy,
    pub series_output: Option<PathBuf>,
    pub report_output: Option<PathBuf>,
}

impl EvaluationEnvConfig {
    pub fn from_env() -> Result<Self> {
        // An explicit row index wins over the fraction
        let split_point = match env::var("SPLIT_INDEX") {
            Ok(v) => SplitPoint::Index(v.parse().context("Failed to parse SPLIT_INDEX")?),
            Err(_) => SplitPoint::Fraction(
                env::var("TRAIN_FRACTION")
                    .unwrap_or_else(|_| "0.8".to_string())
                    .parse()
                    .context("Failed to parse TRAIN_FRACTION")?,
            ),
        };

        let split_policy = env::var("SPLIT_POLICY")
            .unwrap_or_else(|_| "exclusive".to_string())
            .parse::<SplitPolicy>()?;

        Ok(Self {
            split_point,
            split_policy,
            series_output: env::var("SERIES_OUTPUT").ok().map(PathBuf::from),
            report_output: env::var("REPORT_OUTPUT").ok().map(PathBuf::from),
        })
    }
}
