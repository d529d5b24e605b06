// Path: crates/test_utils/src/mock.rs

//! An in-memory stand-in for a real model backend.

use async_trait::async_trait;
use ndarray::Array2;
use pilot_policy::PolicyModel;
use pilot_types::error::PolicyError;
use pilot_types::CanonicalInput;

/// A deterministic `PolicyModel` double.
///
/// Returns a ramp matrix (`actions[t][d] = t * action_dim + d`) so tests
/// can assert exactly which rows and columns survive the output transform.
#[derive(Debug, Clone, Copy)]
pub struct MockPolicyModel {
    /// Action dimensionality reported and produced.
    pub action_dim: usize,
    /// Chunk horizon reported and produced.
    pub action_horizon: usize,
}

#[async_trait]
impl PolicyModel for MockPolicyModel {
    async fn sample_actions(&self, input: &CanonicalInput) -> Result<Array2<f32>, PolicyError> {
        if input.state.len() != self.action_dim {
            return Err(PolicyError::Inference(format!(
                "canonical state has length {}, mock expects {}",
                input.state.len(),
                self.action_dim
            )));
        }
        Ok(Array2::from_shape_fn(
            (self.action_horizon, self.action_dim),
            |(t, d)| (t * self.action_dim + d) as f32,
        ))
    }

    fn action_dim(&self) -> usize {
        self.action_dim
    }

    fn action_horizon(&self) -> usize {
        self.action_horizon
    }
}
