// Path: crates/policy/src/linear.rs

//! The reference linear read-out backend.
//!
//! One dense map from the padded state vector to a flattened action chunk,
//! reshaped to `horizon x action_dim`. Deliberately small: it gives the
//! workspace a real, loadable, deterministic inference function for tests,
//! demos, and latency work, while production-grade networks plug in behind
//! the same [`PolicyModel`] trait.

use crate::model::{CheckpointMetadata, PolicyModel};
use async_trait::async_trait;
use ndarray::{Array1, Array2};
use pilot_types::error::PolicyError;
use pilot_types::CanonicalInput;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// On-disk weight bundle (`weights.bin`, bincode).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearWeights {
    /// `(horizon * action_dim) x action_dim` read-out matrix.
    pub weight: Array2<f32>,
    /// Bias of length `horizon * action_dim`.
    pub bias: Array1<f32>,
}

/// A linear policy head loaded from a checkpoint directory.
pub struct LinearPolicy {
    weights: LinearWeights,
    action_dim: usize,
    action_horizon: usize,
}

impl LinearPolicy {
    /// Loads and shape-checks `weights.bin` against the metadata sidecar.
    pub fn load(dir: &Path, metadata: &CheckpointMetadata) -> Result<Self, PolicyError> {
        let path = dir.join("weights.bin");
        let raw = std::fs::read(&path).map_err(|e| {
            PolicyError::ModelLoad(format!("cannot read {}: {}", path.display(), e))
        })?;
        let weights: LinearWeights = bincode::deserialize(&raw).map_err(|e| {
            PolicyError::ModelLoad(format!("cannot decode {}: {}", path.display(), e))
        })?;

        let rows = metadata.action_horizon * metadata.action_dim;
        if weights.weight.dim() != (rows, metadata.action_dim) || weights.bias.len() != rows {
            return Err(PolicyError::ModelLoad(format!(
                "weight shapes {:?}/{} do not match horizon {} x action_dim {}",
                weights.weight.dim(),
                weights.bias.len(),
                metadata.action_horizon,
                metadata.action_dim,
            )));
        }
        Ok(Self {
            weights,
            action_dim: metadata.action_dim,
            action_horizon: metadata.action_horizon,
        })
    }
}

#[async_trait]
impl PolicyModel for LinearPolicy {
    async fn sample_actions(&self, input: &CanonicalInput) -> Result<Array2<f32>, PolicyError> {
        if input.state.len() != self.action_dim {
            return Err(PolicyError::Inference(format!(
                "canonical state has length {}, model expects {}",
                input.state.len(),
                self.action_dim
            )));
        }
        let flat = self.weights.weight.dot(&input.state) + &self.weights.bias;
        flat.into_shape((self.action_horizon, self.action_dim))
            .map_err(|e| PolicyError::Inference(format!("cannot reshape action chunk: {}", e)))
    }

    fn action_dim(&self) -> usize {
        self.action_dim
    }

    fn action_horizon(&self) -> usize {
        self.action_horizon
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn write_checkpoint(dir: &Path, action_dim: usize, horizon: usize) {
        let rows = horizon * action_dim;
        let weights = LinearWeights {
            weight: Array2::from_shape_fn((rows, action_dim), |(r, c)| {
                if r % action_dim == c {
                    1.0
                } else {
                    0.0
                }
            }),
            bias: Array1::from_elem(rows, 0.5),
        };
        std::fs::write(
            dir.join("weights.bin"),
            bincode::serialize(&weights).unwrap(),
        )
        .unwrap();
        CheckpointMetadata {
            backend: "linear".into(),
            action_dim,
            action_horizon: horizon,
        }
        .save_to_dir(dir)
        .unwrap();
    }

    fn canonical_input(action_dim: usize) -> CanonicalInput {
        CanonicalInput {
            state: Array1::from_shape_fn(action_dim, |i| i as f32),
            images: BTreeMap::new(),
            image_masks: BTreeMap::new(),
            actions: None,
            prompt: None,
        }
    }

    #[tokio::test]
    async fn identity_readout_repeats_state_plus_bias() {
        let dir = tempfile::tempdir().unwrap();
        write_checkpoint(dir.path(), 4, 3);
        let metadata = CheckpointMetadata::load_from_dir(dir.path()).unwrap();
        let model = LinearPolicy::load(dir.path(), &metadata).unwrap();

        let actions = model.sample_actions(&canonical_input(4)).await.unwrap();
        assert_eq!(actions.dim(), (3, 4));
        for t in 0..3 {
            for d in 0..4 {
                assert!((actions[[t, d]] - (d as f32 + 0.5)).abs() < 1e-6);
            }
        }
    }

    #[tokio::test]
    async fn wrong_state_length_is_an_inference_error() {
        let dir = tempfile::tempdir().unwrap();
        write_checkpoint(dir.path(), 4, 3);
        let metadata = CheckpointMetadata::load_from_dir(dir.path()).unwrap();
        let model = LinearPolicy::load(dir.path(), &metadata).unwrap();

        let err = model.sample_actions(&canonical_input(5)).await.unwrap_err();
        assert!(matches!(err, PolicyError::Inference(_)));
    }

    #[test]
    fn corrupt_weights_fail_to_load() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("weights.bin"), b"not bincode").unwrap();
        let metadata = CheckpointMetadata {
            backend: "linear".into(),
            action_dim: 4,
            action_horizon: 3,
        };
        let err = LinearPolicy::load(dir.path(), &metadata).unwrap_err();
        assert!(matches!(err, PolicyError::ModelLoad(_)));
    }

    #[test]
    fn mismatched_shapes_fail_to_load() {
        let dir = tempfile::tempdir().unwrap();
        write_checkpoint(dir.path(), 4, 3);
        let metadata = CheckpointMetadata {
            backend: "linear".into(),
            action_dim: 4,
            action_horizon: 5,
        };
        let err = LinearPolicy::load(dir.path(), &metadata).unwrap_err();
        assert!(matches!(err, PolicyError::ModelLoad(_)));
    }
}
