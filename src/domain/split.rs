use super::errors::PipelineError;
use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// How the boundary row of a train/test split is assigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitPolicy {
    /// train = `[0, t)`, test = `[t, n)`
    #[default]
    Exclusive,
    /// train = `[0, t]`, test = `[t, n)`: row `t` lands in both sets
    Inclusive,
}

impl FromStr for SplitPolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "exclusive" => Ok(SplitPolicy::Exclusive),
            "inclusive" => Ok(SplitPolicy::Inclusive),
            _ => bail!(
                "Invalid SPLIT_POLICY: {}. Must be 'exclusive' or 'inclusive'",
                s
            ),
        }
    }
}

/// Where to cut the table: an explicit row index or a share of rows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SplitPoint {
    Index(usize),
    Fraction(f64),
}

impl SplitPoint {
    /// Resolves to a row threshold for a table of `rows` rows.
    pub fn resolve(self, rows: usize) -> Result<usize> {
        match self {
            SplitPoint::Index(i) => Ok(i),
            SplitPoint::Fraction(f) => {
                if !(f > 0.0 && f < 1.0) {
                    bail!("Train fraction must lie in (0, 1), got {}", f);
                }
                Ok((rows as f64 * f).floor() as usize)
            }
        }
    }
}

/// Train and test views over the same table.
#[derive(Debug, Clone, Copy)]
pub struct Split<'a, T> {
    pub threshold: usize,
    pub train: &'a [T],
    pub test: &'a [T],
}

/// Partitions `rows` by position. A threshold of 0 would leave nothing to
/// train on and one at or past the end nothing to test, so both are rejected.
pub fn split_by_index<T>(
    rows: &[T],
    threshold: usize,
    policy: SplitPolicy,
) -> Result<Split<'_, T>, PipelineError> {
    let n = rows.len();
    if threshold == 0 || threshold >= n {
        return Err(PipelineError::SplitOutOfRange { threshold, rows: n });
    }

    let train_end = match policy {
        SplitPolicy::Exclusive => threshold,
        SplitPolicy::Inclusive => threshold + 1,
    };

    Ok(Split {
        threshold,
        train: &rows[..train_end],
        test: &rows[threshold..],
    })
}
