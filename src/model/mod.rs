//! Model types and artifact persistence

pub mod artifact;
pub mod decision_tree;
pub mod random_forest;

pub use artifact::{load_model, save_model, ModelArtifact, ModelMetadata, MODEL_FILE_NAME};
pub use decision_tree::{RegressionTree, TreeNode};
pub use random_forest::RandomForestRegressor;
