use std::path::Path;

use tracing::info;
use voltage_predictor::{logging, run, PipelineConfig, CONFIG_FILE_NAME};

// forecasting script and entry point
// Reads datums.csv from the working directory, holds out the last week of
// hourly readings, and writes fig.png comparing real and predicted voltage.
fn main() -> anyhow::Result<()> {
    logging::init()?;
    info!("Starting forecasting script...");

    let config = PipelineConfig::load_or_default(Path::new(CONFIG_FILE_NAME))?;

    let report = run(&config)?;

    info!(
        "Done: {} train rows, {} test rows, {} features, MAE {:.3}, chart at {}",
        report.train_rows,
        report.test_rows,
        report.features,
        report.mae,
        report.chart_path.display()
    );
    Ok(())
}
