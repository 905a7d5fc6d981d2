//! Model artifact persistence
//!
//! The fitted forest is wrapped in a checksummed envelope and written to a
//! fixed file name inside the model directory. Training writes the artifact
//! once; inference only reads it.

use crate::error::{MolinoError, Result};
use super::random_forest::RandomForestRegressor;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

/// File name is fixed by the hosting platform's artifact layout.
pub const MODEL_FILE_NAME: &str = "model.joblib";

/// Metadata stored alongside the model bytes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelMetadata {
    /// Feature column names in training order
    pub feature_names: Vec<String>,
    /// Target column name
    pub target_name: String,
    /// Tree count the forest was fitted with
    pub n_estimators: usize,
    /// Bootstrap seed
    pub random_state: u64,
}

/// On-disk envelope around the serialized forest
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    magic: [u8; 4],
    format_version: u32,
    pub metadata: ModelMetadata,
    model_data: Vec<u8>,
    checksum: u64,
}

impl ModelArtifact {
    const MAGIC: [u8; 4] = *b"MOLM";
    const VERSION: u32 = 1;

    fn new(metadata: ModelMetadata, model_data: Vec<u8>) -> Self {
        let checksum = fnv1a(&model_data);
        Self {
            magic: Self::MAGIC,
            format_version: Self::VERSION,
            metadata,
            model_data,
            checksum,
        }
    }

    fn verify(&self) -> Result<()> {
        if self.magic != Self::MAGIC {
            return Err(MolinoError::SerializationError(
                "not a model artifact (bad magic bytes)".to_string(),
            ));
        }
        if self.format_version != Self::VERSION {
            return Err(MolinoError::SerializationError(format!(
                "unsupported artifact format version {}",
                self.format_version
            )));
        }
        if fnv1a(&self.model_data) != self.checksum {
            return Err(MolinoError::SerializationError(
                "checksum mismatch, artifact may be corrupted".to_string(),
            ));
        }
        Ok(())
    }
}

fn fnv1a(data: &[u8]) -> u64 {
    const FNV_OFFSET: u64 = 14695981039346656037;
    const FNV_PRIME: u64 = 1099511628211;

    let mut hash = FNV_OFFSET;
    for byte in data {
        hash ^= *byte as u64;
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}

/// Serialize the forest into `<model_dir>/model.joblib`.
/// Returns the artifact path. The write is not atomic.
pub fn save_model(
    model: &RandomForestRegressor,
    metadata: ModelMetadata,
    model_dir: &Path,
) -> Result<PathBuf> {
    let model_data = bincode::serialize(model)
        .map_err(|e| MolinoError::SerializationError(format!("failed to serialize model: {}", e)))?;
    let artifact = ModelArtifact::new(metadata, model_data);

    let path = model_dir.join(MODEL_FILE_NAME);
    let file = File::create(&path).map_err(|e| {
        MolinoError::DataError(format!("cannot create {}: {}", path.display(), e))
    })?;
    let writer = BufWriter::new(file);

    bincode::serialize_into(writer, &artifact)
        .map_err(|e| MolinoError::SerializationError(format!("failed to write artifact: {}", e)))?;

    Ok(path)
}

/// Read `<model_dir>/model.joblib`, verify the envelope and decode the
/// forest. Missing or corrupt files surface as errors to the caller.
pub fn load_model(model_dir: &Path) -> Result<(RandomForestRegressor, ModelMetadata)> {
    let path = model_dir.join(MODEL_FILE_NAME);
    let file = File::open(&path)
        .map_err(|e| MolinoError::DataError(format!("cannot open {}: {}", path.display(), e)))?;
    let reader = BufReader::new(file);

    let artifact: ModelArtifact = bincode::deserialize_from(reader)
        .map_err(|e| MolinoError::SerializationError(format!("failed to read artifact: {}", e)))?;

    artifact.verify()?;

    let model: RandomForestRegressor = bincode::deserialize(&artifact.model_data)
        .map_err(|e| MolinoError::SerializationError(format!("failed to decode model: {}", e)))?;

    Ok((model, artifact.metadata))
}
