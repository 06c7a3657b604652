use thiserror::Error;

/// Failures raised by the pipeline stages themselves.
///
/// Errors coming out of polars, forust or plotters are wrapped in
/// `anyhow::Error` with stage context instead.
#[derive(Debug, Error, PartialEq)]
pub enum PipelineError {
    #[error("column `{column}` not found in input")]
    MissingColumn { column: String },
    #[error("target column `{column}` has {count} missing values")]
    MissingTargetValues { column: String, count: usize },
    #[error("no feature columns left besides `{index}` and `{target}`")]
    NoFeatureColumns { index: String, target: String },
    #[error("need more than {horizon} rows to hold out a test window, got {rows}")]
    InsufficientRows { rows: usize, horizon: usize },
    #[error("series length mismatch: {actual} actual values vs {predicted} predictions")]
    LengthMismatch { actual: usize, predicted: usize },
    #[error("cannot score an empty series")]
    EmptySeries,
    #[error("non-finite value at position {position}")]
    NonFiniteValue { position: usize },
}
