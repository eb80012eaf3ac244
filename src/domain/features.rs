//! Feature engineering over a daily close series.
//!
//! Each output row carries the previous day's close and the aggregate sign of
//! the three day-to-day moves that precede it. Rows without four prior closes
//! cannot be labelled and are dropped.

use super::errors::PipelineError;
use super::types::{EngineeredRecord, RawRecord, TrendSign};
use ndarray::{Array1, Array2};
use tracing::debug;

/// Prior closes a row needs before its features are defined.
pub const LOOKBACK: usize = 4;

/// Smallest raw series that yields at least one engineered row.
pub const MIN_RAW_RECORDS: usize = LOOKBACK + 1;

pub const FEATURE_NAMES: [&str; 2] = ["day_prev_close", "trend_3_day"];

/// Sorts the series by date and rejects duplicate days and non-finite closes.
pub fn prepare_series(mut raw: Vec<RawRecord>) -> Result<Vec<RawRecord>, PipelineError> {
    raw.sort_by_key(|r| r.date);

    for record in &raw {
        if !record.close.is_finite() {
            return Err(PipelineError::InvalidClose {
                date: record.date,
                close: record.close,
            });
        }
    }

    if let Some(pair) = raw.windows(2).find(|w| w[0].date == w[1].date) {
        return Err(PipelineError::DuplicateDate { date: pair[1].date });
    }

    Ok(raw)
}

/// Turns an ascending close series into the supervised table.
///
/// Output length is `max(0, n - 4)`; the first four records never appear.
pub fn engineer_features(raw: &[RawRecord]) -> Vec<EngineeredRecord> {
    raw.windows(MIN_RAW_RECORDS)
        .map(|w| {
            // w[4] is the current row, w[0..4] its history
            let trend = TrendSign::aggregate([
                TrendSign::of_change(w[2].close, w[3].close),
                TrendSign::of_change(w[1].close, w[2].close),
                TrendSign::of_change(w[0].close, w[1].close),
            ]);
            EngineeredRecord {
                date: w[4].date,
                close: w[4].close,
                day_prev_close: w[3].close,
                trend_3_day: trend,
            }
        })
        .collect()
}

/// Validating front end to [`engineer_features`].
#[derive(Debug, Default, Clone, Copy)]
pub struct FeaturePipeline;

impl FeaturePipeline {
    pub fn new() -> Self {
        Self
    }

    pub fn run(&self, raw: Vec<RawRecord>) -> Result<Vec<EngineeredRecord>, PipelineError> {
        let available = raw.len();
        if available < MIN_RAW_RECORDS {
            return Err(PipelineError::DataIncomplete {
                available,
                required: MIN_RAW_RECORDS,
            });
        }

        let series = prepare_series(raw)?;
        let table = engineer_features(&series);
        debug!(
            "Feature pipeline: {} raw records -> {} engineered rows",
            available,
            table.len()
        );
        Ok(table)
    }
}

/// Design matrix and target vector built from engineered rows.
#[derive(Debug, Clone)]
pub struct FeatureMatrix {
    pub x: Array2<f64>,
    pub y: Array1<f64>,
}

impl FeatureMatrix {
    pub fn from_records(records: &[EngineeredRecord]) -> Self {
        let mut x = Array2::<f64>::zeros((records.len(), FEATURE_NAMES.len()));
        let mut y = Array1::<f64>::zeros(records.len());

        for (i, record) in records.iter().enumerate() {
            x[[i, 0]] = record.day_prev_close;
            x[[i, 1]] = record.trend_3_day.as_f64();
            y[i] = record.close;
        }

        Self { x, y }
    }

    pub fn n_rows(&self) -> usize {
        self.x.nrows()
    }

    pub fn feature_names(&self) -> &'static [&'static str] {
        &FEATURE_NAMES
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn series(closes: &[f64]) -> Vec<RawRecord> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        closes
            .iter()
            .enumerate()
            .map(|(i, &c)| RawRecord::new(start + Duration::days(i as i64), c))
            .collect()
    }

    #[test]
    fn test_reference_example() {
        let raw = series(&[10.0, 9.0, 11.0, 12.0, 13.0]);
        let table = engineer_features(&raw);

        assert_eq!(table.len(), 1);
        assert_eq!(table[0].date, raw[4].date);
        assert_eq!(table[0].close, 13.0);
        assert_eq!(table[0].day_prev_close, 12.0);
        assert_eq!(table[0].trend_3_day, TrendSign::Up);
    }

    #[test]
    fn test_output_length_and_dates() {
        for n in 0..12usize {
            let closes: Vec<f64> = (0..n).map(|i| 100.0 + (i as f64 * 1.7).sin()).collect();
            let raw = series(&closes);
            let table = engineer_features(&raw);

            assert_eq!(table.len(), n.saturating_sub(4), "n = {}", n);
            let expected: Vec<_> = raw.iter().skip(4).map(|r| r.date).collect();
            let got: Vec<_> = table.iter().map(|r| r.date).collect();
            assert_eq!(got, expected);
        }
    }

    #[test]
    fn test_flat_prices_trend_down() {
        let table = engineer_features(&series(&[5.0; 8]));
        assert_eq!(table.len(), 4);
        assert!(table.iter().all(|r| r.trend_3_day == TrendSign::Down));
    }

    #[test]
    fn test_trend_uses_only_prior_moves() {
        // Three falling moves before the last row, then a large jump on it
        let table = engineer_features(&series(&[10.0, 9.0, 8.0, 7.0, 50.0]));
        assert_eq!(table[0].trend_3_day, TrendSign::Down);
        assert_eq!(table[0].day_prev_close, 7.0);
    }

    #[test]
    fn test_pipeline_rejects_short_series() {
        let err = FeaturePipeline::new()
            .run(series(&[1.0, 2.0, 3.0, 4.0]))
            .unwrap_err();
        assert_eq!(
            err,
            PipelineError::DataIncomplete {
                available: 4,
                required: 5
            }
        );
    }

    #[test]
    fn test_pipeline_sorts_unordered_input() {
        let mut raw = series(&[10.0, 9.0, 11.0, 12.0, 13.0]);
        raw.reverse();
        let table = FeaturePipeline::new().run(raw).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table[0].close, 13.0);
        assert_eq!(table[0].trend_3_day, TrendSign::Up);
    }

    #[test]
    fn test_prepare_rejects_duplicate_dates() {
        let mut raw = series(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        raw[3].date = raw[2].date;
        let err = prepare_series(raw).unwrap_err();
        assert!(matches!(err, PipelineError::DuplicateDate { .. }));
    }

    #[test]
    fn test_prepare_rejects_nan_close() {
        let mut raw = series(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        raw[1].close = f64::NAN;
        let err = prepare_series(raw).unwrap_err();
        assert!(matches!(err, PipelineError::InvalidClose { .. }));
    }

    #[test]
    fn test_feature_matrix_layout() {
        let table = engineer_features(&series(&[10.0, 9.0, 11.0, 12.0, 13.0, 12.5]));
        let fm = FeatureMatrix::from_records(&table);

        assert_eq!(fm.x.shape(), &[2, 2]);
        assert_eq!(fm.x[[0, 0]], 12.0);
        assert_eq!(fm.x[[0, 1]], 1.0);
        assert_eq!(fm.x[[1, 0]], 13.0);
        assert_eq!(fm.y.to_vec(), vec![13.0, 12.5]);
        assert_eq!(fm.feature_names(), &["day_prev_close", "trend_3_day"]);
    }
}
