use crate::domain::ports::{PriceSource, SeriesSink};
use crate::domain::types::{ChartPoint, RawRecord};
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Serialize;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use tracing::{debug, info};

/// Reads a `date,close` CSV file. Dates are `YYYY-MM-DD`.
pub struct CsvPriceSource {
    path: PathBuf,
}

impl CsvPriceSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn read_records(&self) -> Result<Vec<RawRecord>> {
        let file = File::open(&self.path)
            .with_context(|| format!("Failed to open price file {:?}", self.path))?;
        let mut rdr = csv::Reader::from_reader(BufReader::new(file));

        let mut records = Vec::new();
        for (line, result) in rdr.deserialize().enumerate() {
            let record: RawRecord = result
                .with_context(|| format!("Bad record at data line {} of {:?}", line + 1, self.path))?;
            records.push(record);
        }

        debug!("Read {} closes from {:?}", records.len(), self.path);
        Ok(records)
    }
}

#[async_trait]
impl PriceSource for CsvPriceSource {
    async fn fetch_closes(&self, dataset: &str) -> Result<Vec<RawRecord>> {
        info!("Loading dataset {} from {:?}", dataset, self.path);
        self.read_records()
    }

    fn name(&self) -> &str {
        "csv"
    }
}

#[derive(Serialize)]
struct SeriesRow {
    date: String,
    close: f64,
    trend_3_day: i8,
    prediction: Option<f64>,
}

/// Writes the engineered series (plus test-set predictions) as CSV.
pub struct CsvSeriesSink {
    path: PathBuf,
}

impl CsvSeriesSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SeriesSink for CsvSeriesSink {
    fn render(&mut self, points: &[ChartPoint]) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {:?}", parent))?;
        }

        let mut wtr = csv::Writer::from_path(&self.path)
            .with_context(|| format!("Failed to create series file {:?}", self.path))?;
        for p in points {
            wtr.serialize(SeriesRow {
                date: p.date.to_string(),
                close: p.close,
                trend_3_day: p.trend_3_day.as_i8(),
                prediction: p.prediction,
            })?;
        }
        wtr.flush()?;

        info!("Wrote {} series rows to {:?}", points.len(), self.path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::TrendSign;
    use chrono::NaiveDate;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("pricefit_{}_{}", std::process::id(), name))
    }

    #[test]
    fn test_reads_date_close_file() {
        let path = temp_path("closes.csv");
        std::fs::write(&path, "date,close\n2024-01-02,100.5\n2024-01-03,101.25\n").unwrap();

        let source = CsvPriceSource::new(&path);
        let records = tokio_test::block_on(source.fetch_closes("demo")).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].date, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        assert_eq!(records[1].close, 101.25);

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_reports_bad_line() {
        let path = temp_path("bad.csv");
        std::fs::write(&path, "date,close\n2024-01-02,abc\n").unwrap();

        let err = CsvPriceSource::new(&path).read_records().unwrap_err();
        assert!(format!("{:#}", err).contains("data line 1"));

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_missing_file_errors() {
        assert!(CsvPriceSource::new(temp_path("absent.csv")).read_records().is_err());
    }

    #[test]
    fn test_sink_writes_signed_trend() {
        let path = temp_path("series.csv");
        let date = NaiveDate::from_ymd_opt(2024, 1, 8).unwrap();
        let points = [
            ChartPoint {
                date,
                close: 12.0,
                trend_3_day: TrendSign::Down,
                prediction: None,
            },
            ChartPoint {
                date: date.succ_opt().unwrap(),
                close: 13.0,
                trend_3_day: TrendSign::Up,
                prediction: Some(12.5),
            },
        ];

        CsvSeriesSink::new(&path).render(&points).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], "date,close,trend_3_day,prediction");
        assert_eq!(lines[1], "2024-01-08,12.0,-1,");
        assert_eq!(lines[2], "2024-01-09,13.0,1,12.5");

        std::fs::remove_file(path).ok();
    }
}
