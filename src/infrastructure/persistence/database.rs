use crate::domain::ports::PriceSource;
use crate::domain::types::RawRecord;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::Row;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::str::FromStr;
use tokio::fs;
use tracing::{debug, info};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Daily closes stored in a SQLite warehouse table.
#[derive(Clone)]
pub struct SqlitePriceSource {
    pool: SqlitePool,
}

impl SqlitePriceSource {
    pub async fn connect(db_url: &str) -> Result<Self> {
        // Ensure the directory exists if it's a file path
        if let Some(path_part) = db_url.strip_prefix("sqlite://") {
            let path = Path::new(path_part);
            if let Some(parent) = path.parent()
                && !parent.as_os_str().is_empty()
                && !parent.exists()
            {
                fs::create_dir_all(parent)
                    .await
                    .context("Failed to create database directory")?;
            }
        }

        let options = SqliteConnectOptions::from_str(db_url)?.create_if_missing(true);

        // A single connection keeps `sqlite::memory:` databases shared
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .context("Failed to connect to SQLite database")?;

        info!("Connected to database: {}", db_url);

        let source = Self { pool };
        source.init_schema().await?;
        Ok(source)
    }

    pub async fn init_schema(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS daily_closes (
                dataset TEXT NOT NULL,
                date TEXT NOT NULL,
                close REAL NOT NULL,
                PRIMARY KEY (dataset, date)
            );
            "#,
        )
        .execute(&self.pool)
        .await
        .context("Failed to create daily_closes table")?;

        Ok(())
    }

    /// Upserts closes for `dataset`; returns the number of rows written.
    pub async fn insert_closes(&self, dataset: &str, records: &[RawRecord]) -> Result<usize> {
        let mut tx = self.pool.begin().await?;

        for record in records {
            sqlx::query(
                r#"
                INSERT INTO daily_closes (dataset, date, close)
                VALUES (?, ?, ?)
                ON CONFLICT(dataset, date) DO UPDATE SET close = excluded.close
                "#,
            )
            .bind(dataset)
            .bind(record.date.format(DATE_FORMAT).to_string())
            .bind(record.close)
            .execute(&mut *tx)
            .await
            .with_context(|| format!("Failed to insert close for {}", record.date))?;
        }

        tx.commit().await.context("Failed to commit closes")?;
        debug!("Stored {} closes for dataset {}", records.len(), dataset);
        Ok(records.len())
    }
}

#[async_trait]
impl PriceSource for SqlitePriceSource {
    async fn fetch_closes(&self, dataset: &str) -> Result<Vec<RawRecord>> {
        let rows = sqlx::query("SELECT date, close FROM daily_closes WHERE dataset = ? ORDER BY date")
            .bind(dataset)
            .fetch_all(&self.pool)
            .await
            .with_context(|| format!("Failed to query closes for dataset {}", dataset))?;

        let mut records = Vec::with_capacity(rows.len());
        for row in rows {
            let date_str: String = row.try_get("date")?;
            let date = NaiveDate::parse_from_str(&date_str, DATE_FORMAT)
                .with_context(|| format!("Invalid date in daily_closes: {}", date_str))?;
            let close: f64 = row.try_get("close")?;
            records.push(RawRecord::new(date, close));
        }

        Ok(records)
    }

    fn name(&self) -> &str {
        "sqlite"
    }
}
