use chrono::NaiveDate;
use thiserror::Error;

/// Errors raised by the feature pipeline and the fit/evaluate step
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PipelineError {
    #[error("Not enough price history: {available} records available, {required} required")]
    DataIncomplete { available: usize, required: usize },

    #[error("Training matrix is rank-deficient: {reason}")]
    NumericalDegeneracy { reason: String },

    #[error("Split threshold {threshold} out of range for {rows} rows (valid: 1..{rows})")]
    SplitOutOfRange { threshold: usize, rows: usize },

    #[error("Duplicate trading day in price series: {date}")]
    DuplicateDate { date: NaiveDate },

    #[error("Invalid close on {date}: {close}")]
    InvalidClose { date: NaiveDate, close: f64 },

    #[error("Dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_error_message_names_bounds() {
        let err = PipelineError::SplitOutOfRange {
            threshold: 0,
            rows: 12,
        };
        assert_eq!(
            err.to_string(),
            "Split threshold 0 out of range for 12 rows (valid: 1..12)"
        );
    }
}
