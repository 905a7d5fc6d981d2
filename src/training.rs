//! One-shot training flow
//!
//! Runs linearly: load the train channel CSV, split off the target column,
//! fit the forest, persist the artifact. Any failure aborts the run; the
//! hosting platform owns restart policy.

use crate::data::{self, TARGET_COLUMN};
use crate::error::{MolinoError, Result};
use crate::model::artifact::{self, ModelMetadata};
use crate::model::RandomForestRegressor;
use ndarray::Array1;
use std::path::PathBuf;
use tracing::info;

/// Resolved training configuration
#[derive(Debug, Clone)]
pub struct TrainingConfig {
    /// Number of trees in the forest
    pub n_estimators: usize,
    /// Seed for bootstrap sampling
    pub random_state: u64,
    /// Directory the artifact is written to
    pub model_dir: PathBuf,
    /// Directory containing `train.csv`
    pub train_dir: PathBuf,
}

impl TrainingConfig {
    pub fn validate(&self) -> Result<()> {
        if self.n_estimators == 0 {
            return Err(MolinoError::ConfigError(
                "n-estimators must be a positive integer".to_string(),
            ));
        }
        Ok(())
    }
}

/// Summary of a completed training run
#[derive(Debug, Clone)]
pub struct TrainingReport {
    pub n_rows: usize,
    pub n_features: usize,
    /// Mean squared error on the training set
    pub mse: f64,
    /// R-squared on the training set
    pub r2: f64,
    pub artifact_path: PathBuf,
}

/// Execute the training flow end to end.
pub fn run(config: &TrainingConfig) -> Result<TrainingReport> {
    config.validate()?;

    info!(dir = %config.train_dir.display(), "loading training data");
    let dataset = data::load_training_data(&config.train_dir)?;
    info!(
        rows = dataset.n_rows(),
        features = dataset.n_features(),
        "training data loaded"
    );

    let mut forest =
        RandomForestRegressor::new(config.n_estimators).with_random_state(config.random_state);

    info!(
        n_estimators = config.n_estimators,
        random_state = config.random_state,
        "fitting random forest"
    );
    forest.fit(&dataset.features, &dataset.target)?;

    let fitted = forest.predict(&dataset.features)?;
    let (mse, r2) = regression_metrics(&dataset.target, &fitted);
    info!(mse, r2, "training complete");

    std::fs::create_dir_all(&config.model_dir)?;
    let metadata = ModelMetadata {
        feature_names: dataset.feature_names.clone(),
        target_name: TARGET_COLUMN.to_string(),
        n_estimators: config.n_estimators,
        random_state: config.random_state,
    };
    let artifact_path = artifact::save_model(&forest, metadata, &config.model_dir)?;
    info!(path = %artifact_path.display(), "model saved");

    Ok(TrainingReport {
        n_rows: dataset.n_rows(),
        n_features: dataset.n_features(),
        mse,
        r2,
        artifact_path,
    })
}

fn regression_metrics(y_true: &Array1<f64>, y_pred: &Array1<f64>) -> (f64, f64) {
    let n = y_true.len() as f64;
    let mse = y_true
        .iter()
        .zip(y_pred.iter())
        .map(|(t, p)| (t - p).powi(2))
        .sum::<f64>()
        / n;

    let mean = y_true.sum() / n;
    let ss_tot: f64 = y_true.iter().map(|t| (t - mean).powi(2)).sum();
    let ss_res: f64 = y_true
        .iter()
        .zip(y_pred.iter())
        .map(|(t, p)| (t - p).powi(2))
        .sum();
    let r2 = if ss_tot > 0.0 { 1.0 - ss_res / ss_tot } else { 0.0 };

    (mse, r2)
}
