// Path: crates/policy/src/trained.rs

//! The assembled inference pipeline: input transform, model backend,
//! output transform.

use crate::model::{load_model, PolicyModel};
use pilot_telemetry::inference_metrics;
use pilot_telemetry::sinks::InferenceMetricsSink;
use pilot_telemetry::time::Timer;
use pilot_transforms::{InputTransform, OutputTransform};
use pilot_types::config::PolicyConfig;
use pilot_types::error::{ErrorCode, PolicyError};
use pilot_types::{ActionResult, RawObservation};
use std::path::Path;

/// One loaded, servable policy.
///
/// Process-wide single instance: created once at startup, owned by the
/// serving loop, dropped on every exit path. Nothing about an individual
/// call survives the call.
pub struct TrainedPolicy {
    config: PolicyConfig,
    input: InputTransform,
    model: Box<dyn PolicyModel>,
    output: OutputTransform,
}

/// Builds a servable policy from a profile and a resolved checkpoint
/// directory.
pub fn create_trained_policy(
    config: &PolicyConfig,
    checkpoint: &Path,
) -> Result<TrainedPolicy, PolicyError> {
    let model = load_model(checkpoint, config)?;
    tracing::info!(
        target: "policy",
        profile = %config.name,
        variant = %config.variant,
        action_dim = config.action_dim,
        action_horizon = config.action_horizon,
        robot_dof = config.robot_dof,
        checkpoint = %checkpoint.display(),
        "policy loaded"
    );
    Ok(TrainedPolicy {
        config: config.clone(),
        input: InputTransform::new(config.action_dim, config.variant),
        model,
        output: OutputTransform::new(config.robot_dof),
    })
}

impl TrainedPolicy {
    /// Assembles a policy around an already-constructed model backend.
    ///
    /// Embedders and tests use this to skip checkpoint resolution; the
    /// server's normal path goes through [`create_trained_policy`].
    pub fn with_model(config: &PolicyConfig, model: Box<dyn PolicyModel>) -> Self {
        Self {
            config: config.clone(),
            input: InputTransform::new(config.action_dim, config.variant),
            model,
            output: OutputTransform::new(config.robot_dof),
        }
    }

    /// The profile this policy was built from.
    pub fn config(&self) -> &PolicyConfig {
        &self.config
    }

    /// Runs one observation through the full pipeline.
    ///
    /// Per-call failures (transform or inference) are returned to the
    /// caller and never poison the loaded policy.
    pub async fn infer(&self, obs: &RawObservation) -> Result<ActionResult, PolicyError> {
        let _timer = Timer::new(inference_metrics());
        let result = self.infer_inner(obs).await;
        match &result {
            Ok(_) => inference_metrics().inc_inference_calls("ok"),
            Err(e) => inference_metrics().inc_inference_calls(e.code()),
        }
        result
    }

    async fn infer_inner(&self, obs: &RawObservation) -> Result<ActionResult, PolicyError> {
        let canonical = self.input.apply(obs)?;
        let actions = self.model.sample_actions(&canonical).await?;
        Ok(self.output.apply(ActionResult { actions })?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::linear::LinearWeights;
    use crate::model::CheckpointMetadata;
    use ndarray::{Array1, Array2, Array3};
    use pilot_types::config::ModelVariant;
    use pilot_types::{ImageFrame, Prompt};

    fn test_profile() -> PolicyConfig {
        PolicyConfig {
            name: "test".into(),
            variant: ModelVariant::Base,
            action_dim: 8,
            action_horizon: 4,
            robot_dof: 5,
        }
    }

    fn write_identity_checkpoint(dir: &Path, config: &PolicyConfig) {
        let rows = config.action_horizon * config.action_dim;
        let weights = LinearWeights {
            weight: Array2::from_shape_fn((rows, config.action_dim), |(r, c)| {
                if r % config.action_dim == c {
                    1.0
                } else {
                    0.0
                }
            }),
            bias: Array1::zeros(rows),
        };
        std::fs::write(
            dir.join("weights.bin"),
            bincode::serialize(&weights).unwrap(),
        )
        .unwrap();
        CheckpointMetadata {
            backend: "linear".into(),
            action_dim: config.action_dim,
            action_horizon: config.action_horizon,
        }
        .save_to_dir(dir)
        .unwrap();
    }

    fn observation(dof: usize) -> RawObservation {
        RawObservation {
            state: (0..dof).map(|i| (i + 1) as f32).collect(),
            image: ImageFrame::Uint8(Array3::from_elem((16, 16, 3), 5)),
            wrist_image: None,
            prompt: Some(Prompt::Text("reach the target".into())),
            actions: None,
        }
    }

    #[tokio::test]
    async fn end_to_end_pipeline_truncates_to_robot_dof() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_profile();
        write_identity_checkpoint(dir.path(), &config);
        let policy = create_trained_policy(&config, dir.path()).unwrap();

        let result = policy.infer(&observation(5)).await.unwrap();
        assert_eq!(result.actions.dim(), (4, 5));
        // Identity read-out repeats the padded state per time-step; the
        // first robot_dof columns carry the original state back.
        for t in 0..4 {
            for d in 0..5 {
                assert!((result.actions[[t, d]] - (d + 1) as f32).abs() < 1e-6);
            }
        }
    }

    #[tokio::test]
    async fn overlong_state_surfaces_as_transform_error() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_profile();
        write_identity_checkpoint(dir.path(), &config);
        let policy = create_trained_policy(&config, dir.path()).unwrap();

        let err = policy.infer(&observation(12)).await.unwrap_err();
        assert_eq!(err.code(), "TRANSFORM_DIMENSION_OVERFLOW");
    }

    #[test]
    fn profile_checkpoint_mismatch_fails_at_load() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_profile();
        write_identity_checkpoint(dir.path(), &config);

        let mut wrong = config.clone();
        wrong.action_dim = 16;
        let err = create_trained_policy(&wrong, dir.path()).unwrap_err();
        assert!(matches!(err, PolicyError::ModelLoad(_)));
    }
}
