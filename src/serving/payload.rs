//! Request and response wire formats
//!
//! The supported formats are a closed set: three request content types,
//! two response accept types. Anything else is rejected with an error
//! naming the offending type; there is no sniffing or fallback.

use crate::error::{MolinoError, Result};
use ndarray::{Array1, Array2, Axis};
use ndarray_npy::ReadNpyExt;
use polars::prelude::*;
use serde::Deserialize;
use std::io::Cursor;

pub const MIME_JSON: &str = "application/json";
pub const MIME_CSV: &str = "text/csv";
pub const MIME_NPY: &str = "application/x-npy";

/// Supported request body encodings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentType {
    Json,
    Csv,
    Npy,
}

impl ContentType {
    pub fn parse(header: &str) -> Result<Self> {
        match header {
            MIME_JSON => Ok(Self::Json),
            MIME_CSV => Ok(Self::Csv),
            MIME_NPY => Ok(Self::Npy),
            other => Err(MolinoError::UnsupportedContentType(other.to_string())),
        }
    }
}

/// Supported response encodings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcceptType {
    Json,
    Csv,
}

impl AcceptType {
    /// The header may carry a trailing parameter such as `; charset=utf-8`.
    pub fn parse(header: &str) -> Result<Self> {
        let mime = header.split(';').next().unwrap_or(header).trim();
        match mime {
            MIME_JSON => Ok(Self::Json),
            MIME_CSV => Ok(Self::Csv),
            _ => Err(MolinoError::UnsupportedAcceptType(header.to_string())),
        }
    }
}

/// Decode a request body into a sample matrix.
pub fn decode_matrix(body: &[u8], content_type: ContentType) -> Result<Array2<f64>> {
    match content_type {
        ContentType::Json => decode_json(body),
        ContentType::Csv => decode_csv(body),
        ContentType::Npy => decode_npy(body),
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum JsonMatrix {
    Rows(Vec<Vec<f64>>),
    // A flat array is a single sample.
    Flat(Vec<f64>),
}

fn decode_json(body: &[u8]) -> Result<Array2<f64>> {
    let parsed: JsonMatrix = serde_json::from_slice(body)
        .map_err(|e| MolinoError::DataError(format!("malformed JSON payload: {}", e)))?;

    match parsed {
        JsonMatrix::Rows(rows) => rows_to_matrix(rows),
        JsonMatrix::Flat(row) => {
            let n = row.len();
            Array2::from_shape_vec((1, n), row)
                .map_err(|e| MolinoError::DataError(e.to_string()))
        }
    }
}

fn rows_to_matrix(rows: Vec<Vec<f64>>) -> Result<Array2<f64>> {
    let n_rows = rows.len();
    let n_cols = rows.first().map_or(0, |r| r.len());

    if let Some(bad) = rows.iter().find(|r| r.len() != n_cols) {
        return Err(MolinoError::ShapeError {
            expected: format!("{} columns per row", n_cols),
            actual: format!("{} columns", bad.len()),
        });
    }

    let flat: Vec<f64> = rows.into_iter().flatten().collect();
    Array2::from_shape_vec((n_rows, n_cols), flat)
        .map_err(|e| MolinoError::DataError(e.to_string()))
}

fn decode_csv(body: &[u8]) -> Result<Array2<f64>> {
    let df = CsvReadOptions::default()
        .with_has_header(false)
        .with_infer_schema_length(Some(100))
        .into_reader_with_file_handle(Cursor::new(body))
        .finish()
        .map_err(|e| MolinoError::DataError(format!("malformed CSV payload: {}", e)))?;

    for column in df.get_columns() {
        if !is_numeric_dtype(column.dtype()) {
            return Err(MolinoError::DataError(format!(
                "malformed CSV payload: non-numeric value in column {}",
                column.name()
            )));
        }
    }

    let names: Vec<String> = df
        .get_column_names()
        .into_iter()
        .map(|s| s.to_string())
        .collect();
    crate::data::columns_to_array2(&df, &names)
}

fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::Float32
            | DataType::Float64
    )
}

fn decode_npy(body: &[u8]) -> Result<Array2<f64>> {
    if let Ok(matrix) = Array2::<f64>::read_npy(Cursor::new(body)) {
        return Ok(matrix);
    }

    // A 1-D array is a single sample.
    let row = Array1::<f64>::read_npy(Cursor::new(body))
        .map_err(|e| MolinoError::DataError(format!("malformed NPY payload: {}", e)))?;
    Ok(row.insert_axis(Axis(0)))
}

/// Encode a prediction vector as a `(body, content-type)` pair.
pub fn encode_prediction(
    prediction: &Array1<f64>,
    accept: AcceptType,
) -> Result<(String, &'static str)> {
    match accept {
        AcceptType::Json => {
            let body = serde_json::to_string(&prediction.to_vec())?;
            Ok((body, MIME_JSON))
        }
        AcceptType::Csv => {
            let body = prediction
                .iter()
                .map(|v| v.to_string())
                .collect::<Vec<String>>()
                .join("\n");
            Ok((body, MIME_CSV))
        }
    }
}
