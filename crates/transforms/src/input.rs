// Path: crates/transforms/src/input.rs

//! The forward transform: one raw robot observation into the canonical
//! model input.

use crate::image::{normalize_frame, zero_frame};
use crate::variant::{slot_layout, FrameSource};
use ndarray::{s, Array1, Array2, ArrayView1};
use pilot_types::error::TransformError;
use pilot_types::{CanonicalInput, ModelVariant, Prompt, RawObservation};
use std::collections::BTreeMap;

/// Right-pads a vector with zeros up to `dim`.
///
/// A vector longer than `dim` is a hard failure; silently truncating robot
/// state would feed the model garbage without anyone noticing.
pub fn pad_vector(values: &[f32], dim: usize) -> Result<Array1<f32>, TransformError> {
    if values.len() > dim {
        return Err(TransformError::DimensionOverflow {
            limit: dim,
            got: values.len(),
        });
    }
    let mut padded = Array1::zeros(dim);
    padded
        .slice_mut(s![..values.len()])
        .assign(&ArrayView1::from(values));
    Ok(padded)
}

/// Right-pads every row of a matrix with zeros up to `dim` columns.
pub fn pad_columns(matrix: &Array2<f32>, dim: usize) -> Result<Array2<f32>, TransformError> {
    let (rows, cols) = matrix.dim();
    if cols > dim {
        return Err(TransformError::DimensionOverflow {
            limit: dim,
            got: cols,
        });
    }
    let mut padded = Array2::zeros((rows, dim));
    padded.slice_mut(s![.., ..cols]).assign(matrix);
    Ok(padded)
}

/// Maps a [`RawObservation`] into the fixed layout a model variant expects.
///
/// Construction fixes the `(action_dim, variant)` pair for the lifetime of
/// the transform; per-call data only ever flows through [`Self::apply`].
#[derive(Debug, Clone, Copy)]
pub struct InputTransform {
    action_dim: usize,
    variant: ModelVariant,
}

impl InputTransform {
    /// A transform targeting the given model action dimension and variant.
    pub fn new(action_dim: usize, variant: ModelVariant) -> Self {
        Self {
            action_dim,
            variant,
        }
    }

    /// Produces the canonical input for one observation.
    ///
    /// The state vector is zero-padded to the model's action dimension, the
    /// primary frame is normalized, a missing wrist frame is replaced by an
    /// all-zero frame of the primary's shape, and camera slots and masks are
    /// filled from the variant's slot table. Training-time actions are
    /// padded like the state; byte prompts are decoded to UTF-8.
    pub fn apply(&self, obs: &RawObservation) -> Result<CanonicalInput, TransformError> {
        let state = pad_vector(&obs.state, self.action_dim)?;

        let base = normalize_frame(&obs.image);
        let wrist = match &obs.wrist_image {
            Some(frame) => normalize_frame(frame),
            None => zero_frame(&base),
        };

        let mut images = BTreeMap::new();
        let mut image_masks = BTreeMap::new();
        for slot in slot_layout(self.variant) {
            let frame = match slot.source {
                FrameSource::Base => base.clone(),
                FrameSource::Wrist => wrist.clone(),
                FrameSource::Padding => zero_frame(&base),
            };
            images.insert(slot.name.to_string(), frame);
            image_masks.insert(slot.name.to_string(), slot.mask);
        }

        let actions = match &obs.actions {
            Some(matrix) => Some(pad_columns(matrix, self.action_dim)?),
            None => None,
        };

        let prompt = match &obs.prompt {
            Some(Prompt::Text(text)) => Some(text.clone()),
            Some(Prompt::Bytes(bytes)) => Some(
                String::from_utf8(bytes.clone())
                    .map_err(|e| TransformError::InvalidPrompt(e.to_string()))?,
            ),
            None => None,
        };

        Ok(CanonicalInput {
            state,
            images,
            image_masks,
            actions,
            prompt,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array3;
    use pilot_types::ImageFrame;

    fn observation(dof: usize, with_wrist: bool) -> RawObservation {
        RawObservation {
            state: (0..dof).map(|i| i as f32 * 0.1).collect(),
            image: ImageFrame::Uint8(Array3::from_elem((224, 224, 3), 7)),
            wrist_image: with_wrist.then(|| ImageFrame::Uint8(Array3::from_elem((224, 224, 3), 9))),
            prompt: Some(Prompt::Text("perform manipulation task".into())),
            actions: None,
        }
    }

    #[test]
    fn state_is_padded_with_zero_tail() {
        let out = InputTransform::new(32, ModelVariant::Base)
            .apply(&observation(16, true))
            .unwrap();
        assert_eq!(out.state.len(), 32);
        for i in 0..16 {
            assert!((out.state[i] - i as f32 * 0.1).abs() < 1e-6);
        }
        assert!(out.state.slice(s![16..]).iter().all(|&v| v == 0.0));
    }

    #[test]
    fn overlong_state_is_a_hard_failure() {
        let err = InputTransform::new(8, ModelVariant::Base)
            .apply(&observation(16, true))
            .unwrap_err();
        assert!(matches!(
            err,
            TransformError::DimensionOverflow { limit: 8, got: 16 }
        ));
    }

    // End-to-end scenario: 16-DOF state, two 224x224x3 frames, base variant.
    #[test]
    fn base_variant_slots_and_masks() {
        let out = InputTransform::new(32, ModelVariant::Base)
            .apply(&observation(16, true))
            .unwrap();
        let names: Vec<_> = out.images.keys().cloned().collect();
        assert_eq!(names, ["base_0_rgb", "left_wrist_0_rgb", "right_wrist_0_rgb"]);
        assert_eq!(out.image_masks["base_0_rgb"], true);
        assert_eq!(out.image_masks["left_wrist_0_rgb"], true);
        assert_eq!(out.image_masks["right_wrist_0_rgb"], false);
        assert!(out.images["base_0_rgb"].iter().all(|&v| v == 7));
        assert!(out.images["left_wrist_0_rgb"].iter().all(|&v| v == 9));
        assert!(out.images["right_wrist_0_rgb"].iter().all(|&v| v == 0));
    }

    // Same observation under the FAST variant: wrist lands in the third
    // slot and the padding slot stays unmasked.
    #[test]
    fn fast_variant_slots_and_masks() {
        let out = InputTransform::new(32, ModelVariant::Fast)
            .apply(&observation(16, true))
            .unwrap();
        let names: Vec<_> = out.images.keys().cloned().collect();
        assert_eq!(names, ["base_0_rgb", "base_1_rgb", "wrist_0_rgb"]);
        assert!(out.image_masks.values().all(|&m| m));
        assert!(out.images["base_1_rgb"].iter().all(|&v| v == 0));
        assert!(out.images["wrist_0_rgb"].iter().all(|&v| v == 9));
    }

    #[test]
    fn missing_wrist_image_becomes_zero_frame_masked_per_variant() {
        let base = InputTransform::new(32, ModelVariant::Base)
            .apply(&observation(16, false))
            .unwrap();
        assert!(base.images["left_wrist_0_rgb"].iter().all(|&v| v == 0));
        // The wrist slot itself stays masked true; only the padding slot is
        // masked false for the base variant.
        assert_eq!(base.image_masks["left_wrist_0_rgb"], true);
        assert_eq!(base.image_masks["right_wrist_0_rgb"], false);

        let fast = InputTransform::new(32, ModelVariant::Fast)
            .apply(&observation(16, false))
            .unwrap();
        assert!(fast.image_masks.values().all(|&m| m));
    }

    #[test]
    fn training_actions_are_padded_like_state() {
        let mut obs = observation(16, true);
        obs.actions = Some(Array2::from_elem((50, 16), 1.5));
        let out = InputTransform::new(32, ModelVariant::Base).apply(&obs).unwrap();
        let actions = out.actions.unwrap();
        assert_eq!(actions.dim(), (50, 32));
        assert!(actions.slice(s![.., ..16]).iter().all(|&v| v == 1.5));
        assert!(actions.slice(s![.., 16..]).iter().all(|&v| v == 0.0));
    }

    #[test]
    fn byte_prompt_is_decoded() {
        let mut obs = observation(16, true);
        obs.prompt = Some(Prompt::Bytes(b"stack the cups".to_vec()));
        let out = InputTransform::new(32, ModelVariant::Base).apply(&obs).unwrap();
        assert_eq!(out.prompt.as_deref(), Some("stack the cups"));
    }

    #[test]
    fn invalid_utf8_prompt_is_rejected() {
        let mut obs = observation(16, true);
        obs.prompt = Some(Prompt::Bytes(vec![0xff, 0xfe]));
        let err = InputTransform::new(32, ModelVariant::Base)
            .apply(&obs)
            .unwrap_err();
        assert!(matches!(err, TransformError::InvalidPrompt(_)));
    }

    #[test]
    fn apply_is_deterministic() {
        let transform = InputTransform::new(32, ModelVariant::Fast);
        let obs = observation(16, true);
        assert_eq!(transform.apply(&obs).unwrap(), transform.apply(&obs).unwrap());
    }
}
