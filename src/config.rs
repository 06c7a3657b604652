//! Pipeline settings.
//!
//! Everything has a default matching the fixed behaviour of the forecasting
//! script: read `datums.csv`, hold out the last 168 hourly rows, write
//! `fig.png`. A TOML file can override any subset of fields.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Default filename looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "voltage_predictor.toml";

/// Seven days of hourly observations.
pub const DEFAULT_HORIZON: usize = 7 * 24;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid config TOML in {path}: {source}")]
    ParseToml {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("horizon must be at least 1")]
    InvalidHorizon,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// CSV export of hourly datums.
    pub input: PathBuf,
    /// PNG chart destination, overwritten on every run.
    pub output: PathBuf,
    /// Number of trailing rows held out for testing.
    pub horizon: usize,
    pub columns: ColumnConfig,
    pub booster: BoosterConfig,
    pub chart: ChartConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from("datums.csv"),
            output: PathBuf::from("fig.png"),
            horizon: DEFAULT_HORIZON,
            columns: ColumnConfig::default(),
            booster: BoosterConfig::default(),
            chart: ChartConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Load settings from `path`, falling back to defaults when it does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&text).map_err(|source| ConfigError::ParseToml {
            path: path.to_path_buf(),
            source,
        })?;
        config.validated()
    }

    fn validated(self) -> Result<Self, ConfigError> {
        if self.horizon == 0 {
            return Err(ConfigError::InvalidHorizon);
        }
        Ok(self)
    }
}

/// Names of the columns the loader and splitter care about.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ColumnConfig {
    pub timestamp: String,
    pub target: String,
    /// Identifier columns removed right after loading.
    pub drop: Vec<String>,
}

impl Default for ColumnConfig {
    fn default() -> Self {
        Self {
            timestamp: "timestamp".to_string(),
            target: "voltage$average".to_string(),
            drop: vec!["sourceId".to_string(), "objectId".to_string()],
        }
    }
}

/// Boosting parameters.
///
/// Defaults mirror an untuned LightGBM regressor: 100 rounds at learning
/// rate 0.1, starting from the mean of the training target.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct BoosterConfig {
    pub iterations: usize,
    pub learning_rate: f32,
}

impl Default for BoosterConfig {
    fn default() -> Self {
        Self {
            iterations: 100,
            learning_rate: 0.1,
        }
    }
}

/// Output image size in pixels (16x6 inches at 100 dpi).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub width: u32,
    pub height: u32,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: 1600,
            height: 600,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let config = PipelineConfig::load_or_default(&dir.path().join(CONFIG_FILE_NAME)).unwrap();
        assert_eq!(config, PipelineConfig::default());
        assert_eq!(config.horizon, 168);
        assert_eq!(config.columns.target, "voltage$average");
        assert_eq!(config.chart.width, 1600);
    }

    #[test]
    fn partial_toml_overrides_only_given_fields() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(
            &path,
            "horizon = 24\n\n[columns]\ntarget = \"current$average\"\n",
        )
        .unwrap();

        let config = PipelineConfig::load_or_default(&path).unwrap();
        assert_eq!(config.horizon, 24);
        assert_eq!(config.columns.target, "current$average");
        assert_eq!(config.columns.timestamp, "timestamp");
        assert_eq!(config.columns.drop, vec!["sourceId", "objectId"]);
        assert_eq!(config.input, PathBuf::from("datums.csv"));
        assert_eq!(config.booster, BoosterConfig::default());
    }

    #[test]
    fn zero_horizon_is_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "horizon = 0\n").unwrap();
        assert!(matches!(
            PipelineConfig::load_or_default(&path),
            Err(ConfigError::InvalidHorizon)
        ));
    }

    #[test]
    fn malformed_toml_reports_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "horizon = \"soon\"\n").unwrap();
        let err = PipelineConfig::load_or_default(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ParseToml { .. }));
        assert!(err.to_string().contains(CONFIG_FILE_NAME));
    }
}
