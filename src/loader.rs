//! CSV loading into a timestamp-indexed record table.

use std::path::Path;

use anyhow::Context;
use polars::prelude::*;
use tracing::{debug, info};

use crate::config::ColumnConfig;
use crate::error::PipelineError;

/// Sensor readings with identifier columns removed and a `Float64` target.
///
/// The timestamp column stays in the frame and acts as the row index.
#[derive(Debug, Clone)]
pub struct RecordTable {
    frame: DataFrame,
    index_column: String,
    target_column: String,
}

impl RecordTable {
    /// Drop identifier columns and coerce the target to `Float64`.
    pub fn from_frame(mut frame: DataFrame, columns: &ColumnConfig) -> anyhow::Result<Self> {
        let required = columns
            .drop
            .iter()
            .chain([&columns.timestamp, &columns.target]);
        for name in required {
            require_column(&frame, name)?;
        }

        for name in &columns.drop {
            frame = frame.drop(name)?;
        }

        let target = frame
            .column(&columns.target)?
            .strict_cast(&DataType::Float64)
            .with_context(|| format!("target column `{}` is not numeric", columns.target))?;
        let missing = target.null_count();
        if missing > 0 {
            return Err(PipelineError::MissingTargetValues {
                column: columns.target.clone(),
                count: missing,
            }
            .into());
        }
        frame.with_column(target)?;

        Ok(Self {
            frame,
            index_column: columns.timestamp.clone(),
            target_column: columns.target.clone(),
        })
    }

    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    pub fn height(&self) -> usize {
        self.frame.height()
    }

    /// Contiguous row range, order preserved.
    pub fn slice(&self, offset: usize, length: usize) -> Self {
        Self {
            frame: self.frame.slice(offset as i64, length),
            index_column: self.index_column.clone(),
            target_column: self.target_column.clone(),
        }
    }

    /// Timestamps rendered as strings, one per row.
    pub fn index(&self) -> anyhow::Result<Vec<String>> {
        let column = self
            .frame
            .column(&self.index_column)?
            .cast(&DataType::Utf8)?;
        let labels = column
            .utf8()?
            .into_iter()
            .map(|value| value.unwrap_or_default().to_string())
            .collect();
        Ok(labels)
    }

    pub fn target(&self) -> anyhow::Result<Vec<f64>> {
        let values = self
            .frame
            .column(&self.target_column)?
            .f64()?
            .into_iter()
            .map(|value| value.unwrap_or(f64::NAN))
            .collect();
        Ok(values)
    }

    /// Everything except the index and target columns; at least one must remain.
    pub fn feature_frame(&self) -> anyhow::Result<DataFrame> {
        let features = self
            .frame
            .drop(&self.index_column)?
            .drop(&self.target_column)?;
        if features.width() == 0 {
            return Err(PipelineError::NoFeatureColumns {
                index: self.index_column.clone(),
                target: self.target_column.clone(),
            }
            .into());
        }
        Ok(features)
    }
}

fn require_column(frame: &DataFrame, name: &str) -> Result<(), PipelineError> {
    if frame.get_column_names().iter().any(|column| *column == name) {
        Ok(())
    } else {
        Err(PipelineError::MissingColumn {
            column: name.to_string(),
        })
    }
}

pub fn load_csv_file(file_path: &Path, columns: &ColumnConfig) -> anyhow::Result<RecordTable> {
    // Scan the whole file for types so a late decimal doesn't break an int column.
    let df = CsvReader::from_path(file_path)
        .with_context(|| format!("failed to open {}", file_path.display()))?
        .has_header(true)
        .infer_schema(None)
        .finish()
        .with_context(|| format!("failed to parse {}", file_path.display()))?;

    info!("Loaded {} rows and {} columns", df.height(), df.width());
    debug!("{:?}", df.head(Some(5)));

    RecordTable::from_frame(df, columns)
        .with_context(|| format!("unexpected layout in {}", file_path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const SAMPLE: &str = "\
sourceId,objectId,timestamp,voltage$average,current$average
/inv/1,7,2024-01-01 00:00:00,230,4.5
/inv/1,7,2024-01-01 01:00:00,231.5,
/inv/1,7,2024-01-01 02:00:00,229,4.1
";

    fn write_csv(contents: &str) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempdir().unwrap();
        let path = dir.path().join("datums.csv");
        std::fs::write(&path, contents).unwrap();
        (dir, path)
    }

    #[test]
    fn drops_identifiers_and_casts_target() {
        let (_dir, path) = write_csv(SAMPLE);
        let table = load_csv_file(&path, &ColumnConfig::default()).unwrap();

        let names = table.frame().get_column_names();
        assert_eq!(names, vec!["timestamp", "voltage$average", "current$average"]);
        assert_eq!(
            table.frame().column("voltage$average").unwrap().dtype(),
            &DataType::Float64
        );
        assert_eq!(table.target().unwrap(), vec![230.0, 231.5, 229.0]);
        assert_eq!(table.index().unwrap()[1], "2024-01-01 01:00:00");
    }

    #[test]
    fn feature_frame_excludes_index_and_target() {
        let (_dir, path) = write_csv(SAMPLE);
        let table = load_csv_file(&path, &ColumnConfig::default()).unwrap();
        let features = table.feature_frame().unwrap();
        assert_eq!(features.get_column_names(), vec!["current$average"]);
        assert_eq!(features.height(), 3);
    }

    #[test]
    fn missing_column_is_fatal() {
        let (_dir, path) = write_csv("sourceId,timestamp,voltage$average\na,2024-01-01,1.0\n");
        let err = load_csv_file(&path, &ColumnConfig::default()).unwrap_err();
        assert_eq!(
            err.downcast_ref::<PipelineError>(),
            Some(&PipelineError::MissingColumn {
                column: "objectId".to_string()
            })
        );
    }

    #[test]
    fn missing_file_is_fatal() {
        let dir = tempdir().unwrap();
        let err = load_csv_file(&dir.path().join("absent.csv"), &ColumnConfig::default())
            .unwrap_err();
        assert!(err.to_string().contains("absent.csv"));
    }

    #[test]
    fn null_target_is_rejected() {
        let (_dir, path) = write_csv(
            "sourceId,objectId,timestamp,voltage$average\na,1,t0,230.0\na,1,t1,\n",
        );
        let err = load_csv_file(&path, &ColumnConfig::default()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PipelineError>(),
            Some(PipelineError::MissingTargetValues { count: 1, .. })
        ));
    }

    #[test]
    fn non_numeric_target_is_fatal() {
        let (_dir, path) = write_csv(
            "sourceId,objectId,timestamp,voltage$average,current$average\n\
             a,1,t0,230,4.5\n\
             a,1,t1,abc,4.6\n",
        );
        let err = load_csv_file(&path, &ColumnConfig::default()).unwrap_err();
        let message = format!("{err:#}");
        assert!(message.contains("voltage$average"), "{message}");
        assert!(message.contains("is not numeric"), "{message}");
    }

    #[test]
    fn table_without_feature_columns_has_no_feature_frame() {
        let (_dir, path) = write_csv(
            "sourceId,objectId,timestamp,voltage$average\na,1,t0,230.0\na,1,t1,231.0\n",
        );
        let table = load_csv_file(&path, &ColumnConfig::default()).unwrap();
        let err = table.feature_frame().unwrap_err();
        assert_eq!(
            err.downcast_ref::<PipelineError>(),
            Some(&PipelineError::NoFeatureColumns {
                index: "timestamp".to_string(),
                target: "voltage$average".to_string()
            })
        );
    }

    #[test]
    fn slice_keeps_row_order() {
        let (_dir, path) = write_csv(SAMPLE);
        let table = load_csv_file(&path, &ColumnConfig::default()).unwrap();
        let tail = table.slice(1, 2);
        assert_eq!(tail.height(), 2);
        assert_eq!(
            tail.index().unwrap(),
            vec!["2024-01-01 01:00:00", "2024-01-01 02:00:00"]
        );
        assert_eq!(tail.target().unwrap(), vec![231.5, 229.0]);
    }
}
