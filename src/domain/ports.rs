use crate::domain::types::{ChartPoint, RawRecord};
use anyhow::Result;
use async_trait::async_trait;

/// Read-only access to a daily close series.
///
/// Implementations return the whole series at once; ordering is not
/// required, the feature pipeline sorts by date.
#[async_trait]
pub trait PriceSource: Send + Sync {
    async fn fetch_closes(&self, dataset: &str) -> Result<Vec<RawRecord>>;

    /// Short label used in logs
    fn name(&self) -> &str;
}

/// Receives the engineered series for plotting or export.
pub trait SeriesSink {
    fn render(&mut self, points: &[ChartPoint]) -> Result<()>;
}
