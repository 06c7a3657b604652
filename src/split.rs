//! Chronological train/test partitioning.

use anyhow::Context;
use polars::prelude::*;
use tracing::info;

use crate::error::PipelineError;
use crate::loader::RecordTable;

/// Dense `f64` feature columns stored column-major.
///
/// Missing cells are `NaN`.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureMatrix {
    names: Vec<String>,
    values: Vec<f64>,
    rows: usize,
}

impl FeatureMatrix {
    pub fn from_frame(frame: &DataFrame) -> anyhow::Result<Self> {
        let mut names = Vec::with_capacity(frame.width());
        let mut values = Vec::with_capacity(frame.width() * frame.height());
        for column in frame.get_columns() {
            let numeric = column
                .strict_cast(&DataType::Float64)
                .with_context(|| format!("feature column `{}` is not numeric", column.name()))?;
            values.extend(
                numeric
                    .f64()?
                    .into_iter()
                    .map(|value| value.unwrap_or(f64::NAN)),
            );
            names.push(column.name().to_string());
        }
        Ok(Self {
            names,
            values,
            rows: frame.height(),
        })
    }

    /// Build from named columns of equal length.
    #[cfg(test)]
    pub(crate) fn from_columns(columns: Vec<(String, Vec<f64>)>) -> Self {
        let rows = columns.first().map_or(0, |(_, values)| values.len());
        let mut names = Vec::with_capacity(columns.len());
        let mut values = Vec::with_capacity(columns.len() * rows);
        for (name, column) in columns {
            assert_eq!(column.len(), rows, "column `{name}` has a different length");
            names.push(name);
            values.extend(column);
        }
        Self {
            names,
            values,
            rows,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.names.len()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn column(&self, idx: usize) -> &[f64] {
        &self.values[idx * self.rows..(idx + 1) * self.rows]
    }

    /// Raw values, one column after another.
    pub fn column_major(&self) -> &[f64] {
        &self.values
    }
}

/// One side of the split: timestamps, features and target, aligned by row.
#[derive(Debug, Clone, PartialEq)]
pub struct Partition {
    pub index: Vec<String>,
    pub features: FeatureMatrix,
    pub target: Vec<f64>,
}

impl Partition {
    pub fn len(&self) -> usize {
        self.target.len()
    }

    pub fn is_empty(&self) -> bool {
        self.target.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrainTestSplit {
    pub train: Partition,
    pub test: Partition,
}

pub fn split_features_and_target(table: &RecordTable) -> anyhow::Result<Partition> {
    let features = FeatureMatrix::from_frame(&table.feature_frame()?)?;
    let target = table.target()?;
    let index = table.index()?;
    Ok(Partition {
        index,
        features,
        target,
    })
}

/// Hold out the last `horizon` rows as the test partition.
///
/// No shuffling: the test partition is always the most recent slice.
pub fn train_test_split(table: &RecordTable, horizon: usize) -> anyhow::Result<TrainTestSplit> {
    let rows = table.height();
    if rows <= horizon {
        return Err(PipelineError::InsufficientRows { rows, horizon }.into());
    }
    let split_idx = rows - horizon;

    let train = split_features_and_target(&table.slice(0, split_idx))?;
    let test = split_features_and_target(&table.slice(split_idx, horizon))?;

    info!(
        "Split {} rows into {} train / {} test ({} features)",
        rows,
        train.len(),
        test.len(),
        train.features.cols()
    );
    Ok(TrainTestSplit { train, test })
}
