use crate::config::{Config, SourceKind};
use crate::domain::ports::{PriceSource, SeriesSink};
use crate::infrastructure::csv_source::{CsvPriceSource, CsvSeriesSink};
use crate::infrastructure::mock::SyntheticPriceSource;
use crate::infrastructure::persistence::database::SqlitePriceSource;
use anyhow::Result;
use std::sync::Arc;

pub struct ServiceFactory;

impl ServiceFactory {
    pub async fn create_price_source(config: &Config) -> Result<Arc<dyn PriceSource>> {
        let source: Arc<dyn PriceSource> = match config.source {
            SourceKind::Sqlite => Arc::new(SqlitePriceSource::connect(&config.database_url).await?),
            SourceKind::Csv => Arc::new(CsvPriceSource::new(config.csv_path.clone())),
            SourceKind::Synthetic => Arc::new(SyntheticPriceSource::new(
                config.synthetic_days,
                config.synthetic_seed,
            )),
        };
        Ok(source)
    }

    pub fn create_sinks(config: &Config) -> Vec<Box<dyn SeriesSink>> {
        let mut sinks: Vec<Box<dyn SeriesSink>> = Vec::new();
        if let Some(path) = &config.series_output {
            sinks.push(Box::new(CsvSeriesSink::new(path.clone())));
        }
        sinks
    }
}
