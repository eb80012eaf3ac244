use crate::domain::ports::PriceSource;
use crate::domain::types::RawRecord;
use anyhow::{Result, bail};
use async_trait::async_trait;
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;

/// Seeded random-walk price series over weekdays.
///
/// Same seed, same series: used for offline runs and tests.
#[derive(Debug, Clone)]
pub struct SyntheticPriceSource {
    pub days: usize,
    pub seed: u64,
    pub start: NaiveDate,
    pub start_price: f64,
    /// Max daily move as a fraction of the previous close
    pub max_daily_move: f64,
}

impl SyntheticPriceSource {
    pub fn new(days: usize, seed: u64) -> Self {
        Self {
            days,
            seed,
            start: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap_or_default(),
            start_price: 100.0,
            max_daily_move: 0.02,
        }
    }

    pub fn generate(&self) -> Vec<RawRecord> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut records = Vec::with_capacity(self.days);
        let mut date = self.start;
        let mut price = self.start_price;

        while records.len() < self.days {
            if !matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
                records.push(RawRecord::new(date, price));
                let change = rng.random_range(-self.max_daily_move..=self.max_daily_move);
                price = (price * (1.0 + change)).max(0.01);
            }
            date += Duration::days(1);
        }

        records
    }
}

#[async_trait]
impl PriceSource for SyntheticPriceSource {
    async fn fetch_closes(&self, dataset: &str) -> Result<Vec<RawRecord>> {
        if !(self.max_daily_move >= 0.0 && self.max_daily_move < 1.0) {
            bail!("max_daily_move must lie in [0, 1), got {}", self.max_daily_move);
        }
        info!(
            "Generating {} synthetic closes for {} (seed {})",
            self.days, dataset, self.seed
        );
        Ok(self.generate())
    }

    fn name(&self) -> &str {
        "synthetic"
    }
}
