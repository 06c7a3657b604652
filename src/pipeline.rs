use std::path::PathBuf;

use anyhow::Context;

use crate::config::PipelineConfig;
use crate::evaluate::evaluate;
use crate::loader::load_csv_file;
use crate::model::train_gradient_boosting_model;
use crate::report::{render_chart, ChartData};
use crate::split::train_test_split;

/// Summary of a completed run.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineReport {
    pub train_rows: usize,
    pub test_rows: usize,
    pub features: usize,
    pub mae: f64,
    pub chart_path: PathBuf,
}

// Steps
// 1. Load the datum export
// 2. Hold out the trailing horizon
// 3. Fit the booster on everything before it
// 4. Predict the horizon and score it
// 5. Plot real vs predicted
pub fn run(config: &PipelineConfig) -> anyhow::Result<PipelineReport> {
    let table = load_csv_file(&config.input, &config.columns)?;

    let split = train_test_split(&table, config.horizon)?;

    let model = train_gradient_boosting_model(&split.train, &config.booster)?;

    let evaluation = evaluate(model, &split.test).context("scoring the test window failed")?;

    let chart = ChartData {
        index: &split.test.index,
        actual: &split.test.target,
        predicted: &evaluation.predictions,
        mae: evaluation.mae,
    };
    render_chart(&config.output, &chart, &config.chart)?;

    Ok(PipelineReport {
        train_rows: split.train.len(),
        test_rows: split.test.len(),
        features: split.train.features.cols(),
        mae: evaluation.mae,
        chart_path: config.output.clone(),
    })
}
