//! Regressors that turn a feature matrix into one prediction per row.

use anyhow::Context;
use forust_ml::objective::ObjectiveType;
use forust_ml::{GradientBooster, Matrix};
use tracing::info;

use crate::config::BoosterConfig;
use crate::split::{FeatureMatrix, Partition};

pub trait Predictor {
    fn predict(&self, features: &FeatureMatrix) -> Vec<f64>;
}

/// Gradient-boosted trees fitted with squared loss.
pub struct BoostedRegressor {
    booster: GradientBooster,
}

impl Predictor for BoostedRegressor {
    fn predict(&self, features: &FeatureMatrix) -> Vec<f64> {
        self.booster.predict(&as_matrix(features), true)
    }
}

/// Baseline that always predicts the mean of the training target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeanPredictor {
    mean: f64,
}

impl MeanPredictor {
    pub fn fit(target: &[f64]) -> Self {
        Self { mean: mean(target) }
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }
}

impl Predictor for MeanPredictor {
    fn predict(&self, features: &FeatureMatrix) -> Vec<f64> {
        vec![self.mean; features.rows()]
    }
}

fn as_matrix(features: &FeatureMatrix) -> Matrix<'_, f64> {
    Matrix::new(features.column_major(), features.rows(), features.cols())
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

// Trains a booster on the training partition. Boosting starts from the
// target mean, which is what LightGBM's regression objective does too.
pub fn train_gradient_boosting_model(
    train: &Partition,
    config: &BoosterConfig,
) -> anyhow::Result<BoostedRegressor> {
    let base_score = mean(&train.target);
    let mut booster = GradientBooster::default()
        .set_objective_type(ObjectiveType::SquaredLoss)
        .set_iterations(config.iterations)
        .set_learning_rate(config.learning_rate)
        .set_base_score(base_score);

    booster
        .fit_unweighted(&as_matrix(&train.features), &train.target, None)
        .context("gradient boosting fit failed")?;

    info!(
        "Trained {} rounds on {} rows x {} features (base score {:.3})",
        config.iterations,
        train.features.rows(),
        train.features.cols(),
        base_score
    );
    Ok(BoostedRegressor { booster })
}
