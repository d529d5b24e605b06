// Path: crates/test_utils/src/checkpoints.rs

//! Checkpoint directory writers.

use ndarray::{Array1, Array2};
use pilot_policy::linear::LinearWeights;
use pilot_policy::model::CheckpointMetadata;
use pilot_types::error::PolicyError;
use std::path::Path;

/// Writes a loadable linear checkpoint whose read-out is the identity:
/// every predicted time-step repeats the padded state vector. Handy for
/// end-to-end tests because the action chunk is predictable from the
/// observation alone.
pub fn write_identity_checkpoint(
    dir: &Path,
    action_dim: usize,
    action_horizon: usize,
) -> Result<(), PolicyError> {
    let rows = action_horizon * action_dim;
    let weights = LinearWeights {
        weight: Array2::from_shape_fn((rows, action_dim), |(r, c)| {
            if r % action_dim == c {
                1.0
            } else {
                0.0
            }
        }),
        bias: Array1::zeros(rows),
    };
    let encoded = bincode::serialize(&weights)
        .map_err(|e| PolicyError::ModelLoad(format!("cannot encode fixture weights: {}", e)))?;
    std::fs::write(dir.join("weights.bin"), encoded)
        .map_err(|e| PolicyError::ModelLoad(format!("cannot write fixture weights: {}", e)))?;
    CheckpointMetadata {
        backend: "linear".to_string(),
        action_dim,
        action_horizon,
    }
    .save_to_dir(dir)
}
