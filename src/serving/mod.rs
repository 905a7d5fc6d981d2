//! Hosting-runtime entry hooks
//!
//! The hosting runtime invokes these four free functions per request, in
//! the fixed sequence load model, deserialize request, predict, serialize
//! response. Each is stateless; the loaded model is passed explicitly and
//! never mutated after `model_fn` returns, so hooks are safe to call
//! concurrently for different requests.

pub mod payload;

pub use payload::{AcceptType, ContentType};

use crate::error::Result;
use crate::model::{artifact, RandomForestRegressor};
use ndarray::{Array1, Array2};
use std::path::Path;
use tracing::info;

/// Load the model artifact from the model directory. Called once per
/// process lifetime by the hosting runtime; a missing or corrupt artifact
/// is fatal for the inference process.
pub fn model_fn(model_dir: &Path) -> Result<RandomForestRegressor> {
    info!(dir = %model_dir.display(), "loading model");
    let (model, metadata) = artifact::load_model(model_dir)?;
    info!(
        n_estimators = metadata.n_estimators,
        n_features = metadata.feature_names.len(),
        "model loaded"
    );
    Ok(model)
}

/// Deserialize a request body into a sample matrix according to its
/// declared content type.
pub fn input_fn(request_body: &[u8], request_content_type: &str) -> Result<Array2<f64>> {
    info!(content_type = request_content_type, "deserializing request");
    let content_type = ContentType::parse(request_content_type)?;
    payload::decode_matrix(request_body, content_type)
}

/// Run the model over the input matrix; one prediction per row, in row
/// order.
pub fn predict_fn(input: &Array2<f64>, model: &RandomForestRegressor) -> Result<Array1<f64>> {
    info!(rows = input.nrows(), cols = input.ncols(), "running prediction");
    model.predict(input)
}

/// Serialize a prediction vector according to the declared accept type.
/// Returns the response body and its content type.
pub fn output_fn(prediction: &Array1<f64>, accept_type: &str) -> Result<(String, &'static str)> {
    info!(accept = accept_type, "serializing prediction");
    let accept = AcceptType::parse(accept_type)?;
    payload::encode_prediction(prediction, accept)
}
