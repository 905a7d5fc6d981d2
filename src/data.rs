//! Training dataset loading

use crate::error::{MolinoError, Result};
use ndarray::{Array1, Array2};
use polars::prelude::*;
use std::fs::File;
use std::path::Path;

/// Target column of the training schema. Fixed contract with the data
/// pipeline that produces `train.csv`; not configurable.
pub const TARGET_COLUMN: &str = "rendimiento_t_h";

/// File name the hosting platform stages inside the train channel directory.
pub const TRAIN_FILE_NAME: &str = "train.csv";

/// A loaded dataset, split into feature matrix and target vector.
#[derive(Debug, Clone)]
pub struct TrainingData {
    pub features: Array2<f64>,
    pub target: Array1<f64>,
    pub feature_names: Vec<String>,
}

impl TrainingData {
    pub fn n_rows(&self) -> usize {
        self.features.nrows()
    }

    pub fn n_features(&self) -> usize {
        self.features.ncols()
    }
}

/// Load `<train_dir>/train.csv` and split off the target column.
pub fn load_training_data(train_dir: &Path) -> Result<TrainingData> {
    let path = train_dir.join(TRAIN_FILE_NAME);
    let file = File::open(&path)
        .map_err(|e| MolinoError::DataError(format!("cannot open {}: {}", path.display(), e)))?;

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(100))
        .into_reader_with_file_handle(file)
        .finish()?;

    split_features_target(&df, TARGET_COLUMN)
}

/// Split a DataFrame into a feature matrix (every column except `target`)
/// and the target vector. The target column must be present.
pub fn split_features_target(df: &DataFrame, target: &str) -> Result<TrainingData> {
    let feature_names: Vec<String> = df
        .get_column_names()
        .into_iter()
        .filter(|name| name.as_str() != target)
        .map(|s| s.to_string())
        .collect();

    let target_column = df
        .column(target)
        .map_err(|_| MolinoError::ColumnNotFound(target.to_string()))?;

    let target_f64 = target_column
        .as_materialized_series()
        .cast(&DataType::Float64)?;
    let y: Array1<f64> = target_f64
        .f64()
        .map_err(|e| MolinoError::DataError(e.to_string()))?
        .into_iter()
        .map(|v| v.unwrap_or(0.0))
        .collect();

    let features = columns_to_array2(df, &feature_names)?;

    Ok(TrainingData {
        features,
        target: y,
        feature_names,
    })
}

/// Extract named columns from a DataFrame into a row-major `Array2<f64>`.
/// Columns are cast to f64; nulls become 0.0.
pub(crate) fn columns_to_array2(df: &DataFrame, col_names: &[String]) -> Result<Array2<f64>> {
    let n_rows = df.height();
    let n_cols = col_names.len();

    let col_data: Vec<Vec<f64>> = col_names
        .iter()
        .map(|col_name| {
            let column = df
                .column(col_name)
                .map_err(|_| MolinoError::ColumnNotFound(col_name.clone()))?;
            let series_f64 = column
                .as_materialized_series()
                .cast(&DataType::Float64)
                .map_err(|e| MolinoError::DataError(e.to_string()))?;
            let values: Vec<f64> = series_f64
                .f64()
                .map_err(|e| MolinoError::DataError(e.to_string()))?
                .into_iter()
                .map(|v| v.unwrap_or(0.0))
                .collect();
            Ok(values)
        })
        .collect::<Result<Vec<Vec<f64>>>>()?;

    // Build row-major array directly from the column-major Polars data.
    let col_refs: Vec<&[f64]> = col_data.iter().map(|c| c.as_slice()).collect();
    Ok(Array2::from_shape_fn((n_rows, n_cols), |(r, c)| {
        col_refs[c][r]
    }))
}
