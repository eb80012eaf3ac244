// Fetch -> features -> fit/evaluate orchestration
pub mod workflow;

pub use workflow::{EvaluationReport, RegressionWorkflow, WorkflowOutcome};
