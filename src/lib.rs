pub mod config;
pub mod error;
pub mod evaluate;
pub mod loader;
pub mod logging;
pub mod model;
pub mod pipeline;
pub mod report;
pub mod split;

pub use config::{PipelineConfig, CONFIG_FILE_NAME};
pub use error::PipelineError;
pub use evaluate::{evaluate, mean_absolute_error, round_decimals, Evaluation};
pub use loader::{load_csv_file, RecordTable};
pub use model::{train_gradient_boosting_model, BoostedRegressor, MeanPredictor, Predictor};
pub use pipeline::{run, PipelineReport};
pub use report::{render_chart, ChartData};
pub use split::{split_features_and_target, train_test_split, FeatureMatrix, Partition, TrainTestSplit};
