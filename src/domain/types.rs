use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One trading day of the raw price series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    pub date: NaiveDate,
    pub close: f64,
}

impl RawRecord {
    pub fn new(date: NaiveDate, close: f64) -> Self {
        Self { date, close }
    }
}

/// Direction of a price move, or the aggregate direction of several.
///
/// Only two values exist: a flat move counts as `Down`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "i8", try_from = "i8")]
pub enum TrendSign {
    Up,
    Down,
}

impl TrendSign {
    /// Sign of a single transition `later - earlier`. Ties resolve to `Down`.
    pub fn of_change(earlier: f64, later: f64) -> Self {
        if later - earlier > 0.0 {
            TrendSign::Up
        } else {
            TrendSign::Down
        }
    }

    /// Aggregate sign of several transitions: `Up` only when the sum of
    /// the individual signs is strictly positive.
    pub fn aggregate<I: IntoIterator<Item = TrendSign>>(signs: I) -> Self {
        let sum: i32 = signs.into_iter().map(|s| s.as_i8() as i32).sum();
        if sum > 0 { TrendSign::Up } else { TrendSign::Down }
    }

    pub fn as_i8(self) -> i8 {
        match self {
            TrendSign::Up => 1,
            TrendSign::Down => -1,
        }
    }

    pub fn as_f64(self) -> f64 {
        self.as_i8() as f64
    }
}

impl From<TrendSign> for i8 {
    fn from(sign: TrendSign) -> Self {
        sign.as_i8()
    }
}

impl TryFrom<i8> for TrendSign {
    type Error = String;

    fn try_from(value: i8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(TrendSign::Up),
            -1 => Ok(TrendSign::Down),
            other => Err(format!("trend sign must be +1 or -1, got {}", other)),
        }
    }
}

impl fmt::Display for TrendSign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:+}", self.as_i8())
    }
}

/// A row of the supervised-learning table: features plus the close to predict.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EngineeredRecord {
    pub date: NaiveDate,
    pub close: f64,
    pub day_prev_close: f64,
    pub trend_3_day: TrendSign,
}

/// What a chart or export sink receives for every engineered row.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub date: NaiveDate,
    pub close: f64,
    pub trend_3_day: TrendSign,
    /// Model output, present only for rows in the test set
    pub prediction: Option<f64>,
}

impl From<&EngineeredRecord> for ChartPoint {
    fn from(record: &EngineeredRecord) -> Self {
        Self {
            date: record.date,
            close: record.close,
            trend_3_day: record.trend_3_day,
            prediction: None,
        }
    }
}
