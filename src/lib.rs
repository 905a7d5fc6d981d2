//! molino - random-forest throughput model for SAG mill telemetry
//!
//! A training-and-inference adapter for a hosted ML platform. The training
//! entrypoint fits a random-forest regressor on `train.csv` and persists the
//! artifact; the [`serving`] module exposes the four hooks the hosting
//! runtime invokes at request time.
//!
//! # Modules
//!
//! - [`data`] - CSV dataset loading and feature/target split
//! - [`model`] - regression tree, random forest, artifact persistence
//! - [`training`] - the one-shot training flow
//! - [`serving`] - `model_fn`, `input_fn`, `predict_fn`, `output_fn`

pub mod data;
pub mod error;
pub mod model;
pub mod serving;
pub mod training;

pub use error::{MolinoError, Result};
pub use model::RandomForestRegressor;
pub use serving::{input_fn, model_fn, output_fn, predict_fn};
