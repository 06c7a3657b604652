//! Scoring predictions on the held-out window.

use tracing::info;

use crate::error::PipelineError;
use crate::model::Predictor;
use crate::split::Partition;

/// Decimal places reported for the error metric.
pub const METRIC_DECIMALS: i32 = 3;

#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    /// One value per test row, aligned with `Partition::index`.
    pub predictions: Vec<f64>,
    /// Mean absolute error rounded to `METRIC_DECIMALS`.
    pub mae: f64,
}

/// Predict the test partition and score it. The model is consumed.
pub fn evaluate<P: Predictor>(model: P, test: &Partition) -> anyhow::Result<Evaluation> {
    let predictions = model.predict(&test.features);
    let mae = round_decimals(
        mean_absolute_error(&test.target, &predictions)?,
        METRIC_DECIMALS,
    );
    info!("MAE over {} test rows: {:.3}", test.len(), mae);
    Ok(Evaluation { predictions, mae })
}

pub fn mean_absolute_error(actual: &[f64], predicted: &[f64]) -> Result<f64, PipelineError> {
    if actual.len() != predicted.len() {
        return Err(PipelineError::LengthMismatch {
            actual: actual.len(),
            predicted: predicted.len(),
        });
    }
    if actual.is_empty() {
        return Err(PipelineError::EmptySeries);
    }

    let mut total = 0.0;
    for (position, (a, p)) in actual.iter().zip(predicted).enumerate() {
        if !a.is_finite() || !p.is_finite() {
            return Err(PipelineError::NonFiniteValue { position });
        }
        total += (a - p).abs();
    }
    Ok(total / actual.len() as f64)
}

/// Round half to even at `decimals` places.
pub fn round_decimals(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round_ties_even() / scale
}
