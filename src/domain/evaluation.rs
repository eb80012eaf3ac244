use super::errors::PipelineError;
use super::features::FeatureMatrix;
use super::metrics::RegressionMetrics;
use super::model::ZeroInterceptOls;
use super::split::{SplitPolicy, split_by_index};
use super::types::EngineeredRecord;

/// Everything the fit/evaluate step produces.
#[derive(Debug, Clone)]
pub struct Evaluation {
    pub model: ZeroInterceptOls,
    pub threshold: usize,
    pub n_train: usize,
    pub n_test: usize,
    /// Index of the first test row in the engineered table
    pub test_offset: usize,
    pub predictions: Vec<f64>,
    pub metrics: RegressionMetrics,
}

/// Splits `table` at `threshold`, fits on the train rows and scores the test rows.
pub fn fit_and_evaluate(
    table: &[EngineeredRecord],
    threshold: usize,
    policy: SplitPolicy,
) -> Result<Evaluation, PipelineError> {
    let split = split_by_index(table, threshold, policy)?;

    let train = FeatureMatrix::from_records(split.train);
    let test = FeatureMatrix::from_records(split.test);

    let model = ZeroInterceptOls::fit(&train.x, &train.y)?;
    let predictions = model.predict(&test.x)?.to_vec();
    let actuals = test.y.to_vec();
    let metrics = RegressionMetrics::calculate(&actuals, &predictions)?;

    Ok(Evaluation {
        model,
        threshold,
        n_train: train.n_rows(),
        n_test: test.n_rows(),
        test_offset: threshold,
        predictions,
        metrics,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::TrendSign;
    use chrono::{Duration, NaiveDate};

    fn doubling_table(n: usize) -> Vec<EngineeredRecord> {
        let start = NaiveDate::from_ymd_opt(2023, 6, 1).unwrap();
        (0..n)
            .map(|i| {
                let prev = 40.0 + (i as f64 * 0.9).cos() * 5.0 + i as f64;
                EngineeredRecord {
                    date: start + Duration::days(i as i64),
                    close: 2.0 * prev,
                    day_prev_close: prev,
                    trend_3_day: TrendSign::Up,
                }
            })
            .collect()
    }

    #[test]
    fn test_perfect_relationship_scores_perfectly() {
        let table = doubling_table(30);
        let eval = fit_and_evaluate(&table, 20, SplitPolicy::Exclusive).unwrap();

        assert_eq!(eval.n_train, 20);
        assert_eq!(eval.n_test, 10);
        assert_eq!(eval.predictions.len(), 10);
        assert!((eval.model.coefficients()[0] - 2.0).abs() < 1e-9);
        assert!(eval.metrics.rmse < 1e-6);
        assert!((eval.metrics.r2 - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_inclusive_counts_boundary_twice() {
        let table = doubling_table(30);
        let eval = fit_and_evaluate(&table, 20, SplitPolicy::Inclusive).unwrap();
        assert_eq!(eval.n_train + eval.n_test, 31);
        assert_eq!(eval.test_offset, 20);
    }

    #[test]
    fn test_out_of_range_fails_before_fit() {
        let table = doubling_table(5);
        assert_eq!(
            fit_and_evaluate(&table, 0, SplitPolicy::Exclusive).unwrap_err(),
            PipelineError::SplitOutOfRange {
                threshold: 0,
                rows: 5
            }
        );
        assert!(matches!(
            fit_and_evaluate(&table, 5, SplitPolicy::Exclusive),
            Err(PipelineError::SplitOutOfRange { .. })
        ));
    }

    #[test]
    fn test_single_training_row_is_degenerate() {
        let table = doubling_table(5);
        let err = fit_and_evaluate(&table, 1, SplitPolicy::Exclusive).unwrap_err();
        assert!(matches!(err, PipelineError::NumericalDegeneracy { .. }));
    }
}
