// Path: crates/policy/src/model.rs

//! The model seam and the checkpoint-driven loader.

use async_trait::async_trait;
use ndarray::Array2;
use pilot_types::config::PolicyConfig;
use pilot_types::error::PolicyError;
use pilot_types::CanonicalInput;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// An opaque inference function: canonical input in, action chunk out.
///
/// Everything above this trait (transforms, RPC, binaries) is agnostic to
/// what produces the actions. Implementations may block for a variable,
/// model-dependent duration; no timeout is enforced at this layer.
#[async_trait]
pub trait PolicyModel: Send + Sync {
    /// Samples one action chunk for a canonical input.
    ///
    /// The returned matrix is `action_horizon()` rows by `action_dim()`
    /// columns. Failure modes internal to the model surface as
    /// [`PolicyError::Inference`].
    async fn sample_actions(&self, input: &CanonicalInput) -> Result<Array2<f32>, PolicyError>;

    /// The fixed action dimensionality this model was trained with.
    fn action_dim(&self) -> usize;

    /// Time-steps per predicted action chunk.
    fn action_horizon(&self) -> usize;
}

/// The `metadata.json` sidecar describing what a checkpoint directory holds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckpointMetadata {
    /// Which backend the weights belong to, e.g. `linear`.
    pub backend: String,
    /// Action dimensionality the weights were trained with.
    pub action_dim: usize,
    /// Action-chunk horizon the weights were trained with.
    pub action_horizon: usize,
}

impl CheckpointMetadata {
    /// Reads the sidecar from a checkpoint directory.
    pub fn load_from_dir(dir: &Path) -> Result<Self, PolicyError> {
        let path = dir.join("metadata.json");
        let raw = std::fs::read_to_string(&path).map_err(|e| {
            PolicyError::ModelLoad(format!("cannot read {}: {}", path.display(), e))
        })?;
        serde_json::from_str(&raw).map_err(|e| {
            PolicyError::ModelLoad(format!("cannot parse {}: {}", path.display(), e))
        })
    }

    /// Writes the sidecar into a checkpoint directory.
    pub fn save_to_dir(&self, dir: &Path) -> Result<(), PolicyError> {
        let raw = serde_json::to_string_pretty(self)
            .map_err(|e| PolicyError::ModelLoad(format!("cannot serialize metadata: {}", e)))?;
        std::fs::write(dir.join("metadata.json"), raw)
            .map_err(|e| PolicyError::ModelLoad(format!("cannot write metadata: {}", e)))
    }
}

/// Loads the model backend a checkpoint directory declares.
///
/// The metadata sidecar must agree with the policy profile on action
/// dimension and horizon; a mismatch means the operator is pointing a
/// profile at the wrong weights, which is caught here rather than as
/// garbage actions at runtime.
pub fn load_model(
    checkpoint: &Path,
    config: &PolicyConfig,
) -> Result<Box<dyn PolicyModel>, PolicyError> {
    let metadata = CheckpointMetadata::load_from_dir(checkpoint)?;
    if metadata.action_dim != config.action_dim || metadata.action_horizon != config.action_horizon
    {
        return Err(PolicyError::ModelLoad(format!(
            "checkpoint was trained for action_dim={} horizon={}, profile '{}' expects action_dim={} horizon={}",
            metadata.action_dim,
            metadata.action_horizon,
            config.name,
            config.action_dim,
            config.action_horizon,
        )));
    }
    match metadata.backend.as_str() {
        "linear" => Ok(Box::new(crate::linear::LinearPolicy::load(
            checkpoint, &metadata,
        )?)),
        other => Err(PolicyError::ModelLoad(format!(
            "unknown model backend '{}'",
            other
        ))),
    }
}
