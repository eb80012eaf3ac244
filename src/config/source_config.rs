//! Data source configuration parsing from environment variables.

use anyhow::{Context, Result, bail};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

/// Where the close series comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Sqlite,
    Csv,
    Synthetic,
}

impl FromStr for SourceKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sqlite" => Ok(SourceKind::Sqlite),
            "csv" => Ok(SourceKind::Csv),
            "synthetic" | "mock" => Ok(SourceKind::Synthetic),
            _ => bail!(
                "Invalid PRICE_SOURCE: {}. Must be 'sqlite', 'csv', or 'synthetic'",
                s
            ),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SourceEnvConfig {
    pub source: SourceKind,
    pub database_url: String,
    pub dataset: String,
    pub csv_path: PathBuf,
    pub synthetic_days: usize,
    pub synthetic_seed: u64,
}

impl SourceEnvConfig {
    pub fn from_env() -> Result<Self> {
        let source = env::var("PRICE_SOURCE")
            .unwrap_or_else(|_| "synthetic".to_string())
            .parse::<SourceKind>()?;

        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://data/prices.db".to_string());
        let dataset = env::var("DATASET").unwrap_or_else(|_| "SPY".to_string());
        let csv_path = env::var("CSV_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("data/closes.csv"));

        let synthetic_days = env::var("SYNTHETIC_DAYS")
            .unwrap_or_else(|_| "500".to_string())
            .parse::<usize>()
            .context("Failed to parse SYNTHETIC_DAYS")?;
        let synthetic_seed = env::var("SYNTHETIC_SEED")
            .unwrap_or_else(|_| "42".to_string())
            .parse::<u64>()
            .context("Failed to parse SYNTHETIC_SEED")?;

        Ok(Self {
            source,
            database_url,
            dataset,
            csv_path,
            synthetic_days,
            synthetic_seed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_kind_parsing() {
        assert_eq!("SQLite".parse::<SourceKind>().unwrap(), SourceKind::Sqlite);
        assert_eq!("mock".parse::<SourceKind>().unwrap(), SourceKind::Synthetic);
        assert!("bigquery".parse::<SourceKind>().is_err());
    }
}
