use crate::domain::evaluation::{Evaluation, fit_and_evaluate};
use crate::domain::features::{FEATURE_NAMES, FeaturePipeline};
use crate::domain::model::ZeroInterceptOls;
use crate::domain::ports::{PriceSource, SeriesSink};
use crate::domain::split::{SplitPoint, SplitPolicy};
use crate::domain::types::{ChartPoint, EngineeredRecord};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coefficient {
    pub feature: String,
    pub value: f64,
}

/// Summary of one run, printed by the binary and optionally saved as JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub dataset: String,
    pub source: String,
    pub raw_records: usize,
    pub engineered_rows: usize,
    pub split_threshold: usize,
    pub split_policy: SplitPolicy,
    pub n_train: usize,
    pub n_test: usize,
    pub coefficients: Vec<Coefficient>,
    pub rmse: f64,
    pub r2: f64,
    pub mae: f64,
}

impl EvaluationReport {
    pub fn save_json(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {:?}", parent))?;
        }
        let file = std::fs::File::create(path)
            .with_context(|| format!("Failed to create report file {:?}", path))?;
        serde_json::to_writer_pretty(file, self)?;
        info!("Report saved to {:?}", path);
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct WorkflowOutcome {
    pub table: Vec<EngineeredRecord>,
    pub model: ZeroInterceptOls,
    pub predictions: Vec<f64>,
    pub chart: Vec<ChartPoint>,
    pub report: EvaluationReport,
}

/// fetch -> features -> split -> fit -> predict -> metrics -> sinks
pub struct RegressionWorkflow {
    pipeline: FeaturePipeline,
    split_point: SplitPoint,
    split_policy: SplitPolicy,
}

impl RegressionWorkflow {
    pub fn new(split_point: SplitPoint, split_policy: SplitPolicy) -> Self {
        Self {
            pipeline: FeaturePipeline::new(),
            split_point,
            split_policy,
        }
    }

    pub async fn run(
        &self,
        source: &dyn PriceSource,
        dataset: &str,
        sinks: &mut [Box<dyn SeriesSink>],
    ) -> Result<WorkflowOutcome> {
        info!("Fetching closes for {} from {} source", dataset, source.name());
        let raw = source
            .fetch_closes(dataset)
            .await
            .with_context(|| format!("Failed to fetch closes for {}", dataset))?;
        let raw_records = raw.len();
        info!("Fetched {} raw records", raw_records);

        let table = self.pipeline.run(raw)?;
        info!(
            "Engineered {} rows ({} leading records dropped)",
            table.len(),
            raw_records - table.len()
        );

        let threshold = self.split_point.resolve(table.len())?;
        debug!(
            "Split point {:?} resolved to row {} ({:?})",
            self.split_point, threshold, self.split_policy
        );

        let evaluation = fit_and_evaluate(&table, threshold, self.split_policy)?;
        info!(
            "Fitted on {} rows, evaluated on {} rows",
            evaluation.n_train, evaluation.n_test
        );

        let chart = chart_points(&table, &evaluation);
        for sink in sinks.iter_mut() {
            sink.render(&chart).context("Failed to render series")?;
        }

        let report = EvaluationReport {
            dataset: dataset.to_string(),
            source: source.name().to_string(),
            raw_records,
            engineered_rows: table.len(),
            split_threshold: threshold,
            split_policy: self.split_policy,
            n_train: evaluation.n_train,
            n_test: evaluation.n_test,
            coefficients: FEATURE_NAMES
                .iter()
                .zip(evaluation.model.coefficients())
                .map(|(name, value)| Coefficient {
                    feature: name.to_string(),
                    value: *value,
                })
                .collect(),
            rmse: evaluation.metrics.rmse,
            r2: evaluation.metrics.r2,
            mae: evaluation.metrics.mae,
        };

        Ok(WorkflowOutcome {
            table,
            model: evaluation.model,
            predictions: evaluation.predictions,
            chart,
            report,
        })
    }
}

/// Engineered rows with predictions attached to the test rows.
pub fn chart_points(table: &[EngineeredRecord], evaluation: &Evaluation) -> Vec<ChartPoint> {
    let mut points: Vec<ChartPoint> = table.iter().map(ChartPoint::from).collect();
    for (point, prediction) in points
        .iter_mut()
        .skip(evaluation.test_offset)
        .zip(&evaluation.predictions)
    {
        point.prediction = Some(*prediction);
    }
    points
}
