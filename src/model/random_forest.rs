//! Random-forest regressor

use crate::error::{MolinoError, Result};
use super::decision_tree::RegressionTree;
use ndarray::{Array1, Array2, Axis};
use rand::RngCore;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Bagged ensemble of regression trees; predictions are the per-row mean
/// over all trees.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomForestRegressor {
    trees: Vec<RegressionTree>,
    /// Number of trees
    pub n_estimators: usize,
    /// Maximum depth per tree
    pub max_depth: Option<usize>,
    /// Minimum samples to split
    pub min_samples_split: usize,
    /// Minimum samples in leaf
    pub min_samples_leaf: usize,
    /// Bootstrap sampling
    pub bootstrap: bool,
    /// Seed for bootstrap sampling
    pub random_state: Option<u64>,
    n_features: usize,
}

impl RandomForestRegressor {
    pub fn new(n_estimators: usize) -> Self {
        Self {
            trees: Vec::new(),
            n_estimators,
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            bootstrap: true,
            random_state: None,
            n_features: 0,
        }
    }

    /// Set maximum depth
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Set minimum samples to split
    pub fn with_min_samples_split(mut self, min_samples: usize) -> Self {
        self.min_samples_split = min_samples;
        self
    }

    /// Set minimum samples in leaf
    pub fn with_min_samples_leaf(mut self, min_samples: usize) -> Self {
        self.min_samples_leaf = min_samples;
        self
    }

    /// Set random state
    pub fn with_random_state(mut self, seed: u64) -> Self {
        self.random_state = Some(seed);
        self
    }

    /// Fit the forest; trees are built in parallel, each on its own
    /// seeded bootstrap sample.
    pub fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<&mut Self> {
        let n_samples = x.nrows();

        if self.n_estimators == 0 {
            return Err(MolinoError::ConfigError(
                "n_estimators must be a positive integer".to_string(),
            ));
        }

        if n_samples != y.len() {
            return Err(MolinoError::ShapeError {
                expected: format!("y length = {}", n_samples),
                actual: format!("y length = {}", y.len()),
            });
        }

        if n_samples == 0 {
            return Err(MolinoError::TrainingError(
                "training data has no rows".to_string(),
            ));
        }

        self.n_features = x.ncols();

        let base_seed = self.random_state.unwrap_or(42);

        let trees: Vec<RegressionTree> = (0..self.n_estimators)
            .into_par_iter()
            .map(|tree_idx| {
                let seed = base_seed.wrapping_add(tree_idx as u64);
                let mut rng = ChaCha8Rng::seed_from_u64(seed);

                let sample_indices: Vec<usize> = if self.bootstrap {
                    (0..n_samples)
                        .map(|_| (rng.next_u64() as usize) % n_samples)
                        .collect()
                } else {
                    (0..n_samples).collect()
                };

                let x_boot = x.select(Axis(0), &sample_indices);
                let y_boot: Array1<f64> =
                    Array1::from_vec(sample_indices.iter().map(|&i| y[i]).collect());

                let mut tree = RegressionTree::new()
                    .with_min_samples_split(self.min_samples_split)
                    .with_min_samples_leaf(self.min_samples_leaf);
                if let Some(d) = self.max_depth {
                    tree = tree.with_max_depth(d);
                }

                tree.fit(&x_boot, &y_boot)?;
                Ok(tree)
            })
            .collect::<Result<Vec<RegressionTree>>>()?;

        self.trees = trees;

        Ok(self)
    }

    /// Predict one value per input row, preserving row order.
    pub fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        if self.trees.is_empty() {
            return Err(MolinoError::ModelNotFitted);
        }

        if x.ncols() != self.n_features {
            return Err(MolinoError::ShapeError {
                expected: format!("{} feature columns", self.n_features),
                actual: format!("{} feature columns", x.ncols()),
            });
        }

        let all_predictions: Vec<Array1<f64>> = self
            .trees
            .par_iter()
            .map(|tree| tree.predict(x))
            .collect::<Result<Vec<Array1<f64>>>>()?;

        let n_trees = all_predictions.len() as f64;
        let predictions: Vec<f64> = (0..x.nrows())
            .map(|i| all_predictions.iter().map(|p| p[i]).sum::<f64>() / n_trees)
            .collect();

        Ok(Array1::from_vec(predictions))
    }

    /// Number of fitted trees
    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    /// Feature count seen at fit time
    pub fn n_features(&self) -> usize {
        self.n_features
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn linear_data() -> (Array2<f64>, Array1<f64>) {
        let x = array![
            [1.0, 2.0],
            [2.0, 4.0],
            [3.0, 6.0],
            [4.0, 8.0],
            [5.0, 10.0],
            [6.0, 12.0],
            [7.0, 14.0],
            [8.0, 16.0],
            [9.0, 18.0],
            [10.0, 20.0],
        ];
        let y = array![3.0, 6.0, 9.0, 12.0, 15.0, 18.0, 21.0, 24.0, 27.0, 30.0];
        (x, y)
    }

    #[test]
    fn test_fit_and_predict() {
        let (x, y) = linear_data();

        let mut rf = RandomForestRegressor::new(20).with_random_state(42);
        rf.fit(&x, &y).unwrap();
        assert_eq!(rf.n_trees(), 20);

        let predictions = rf.predict(&x).unwrap();
        assert_eq!(predictions.len(), x.nrows());

        let mse: f64 = predictions
            .iter()
            .zip(y.iter())
            .map(|(p, a)| (p - a).powi(2))
            .sum::<f64>()
            / y.len() as f64;
        assert!(mse < 10.0, "MSE too high: {}", mse);
    }

    #[test]
    fn test_deterministic_with_seed() {
        let (x, y) = linear_data();

        let mut a = RandomForestRegressor::new(10).with_random_state(7);
        a.fit(&x, &y).unwrap();
        let mut b = RandomForestRegressor::new(10).with_random_state(7);
        b.fit(&x, &y).unwrap();

        let pa = a.predict(&x).unwrap();
        let pb = b.predict(&x).unwrap();
        assert_eq!(pa.to_vec(), pb.to_vec());
    }

    #[test]
    fn test_zero_estimators_rejected() {
        let (x, y) = linear_data();
        let mut rf = RandomForestRegressor::new(0);
        let err = rf.fit(&x, &y).unwrap_err();
        assert!(matches!(err, MolinoError::ConfigError(_)));
    }

    #[test]
    fn test_empty_data_rejected() {
        let x = Array2::<f64>::zeros((0, 2));
        let y = Array1::<f64>::zeros(0);
        let mut rf = RandomForestRegressor::new(5);
        assert!(rf.fit(&x, &y).is_err());
    }

    #[test]
    fn test_predict_unfitted_fails() {
        let rf = RandomForestRegressor::new(5);
        let err = rf.predict(&array![[1.0, 2.0]]).unwrap_err();
        assert!(matches!(err, MolinoError::ModelNotFitted));
    }

    #[test]
    fn test_predict_wrong_column_count() {
        let (x, y) = linear_data();
        let mut rf = RandomForestRegressor::new(5).with_random_state(1);
        rf.fit(&x, &y).unwrap();

        let err = rf.predict(&array![[1.0, 2.0, 3.0]]).unwrap_err();
        assert!(matches!(err, MolinoError::ShapeError { .. }));
    }
}
