// Path: crates/types/src/obs.rs

//! Observation and action structures exchanged between a robot control loop
//! and the policy server.
//!
//! `RawObservation` is what a robot produces; `CanonicalInput` is the fixed
//! layout the policy model consumes. The mapping between the two lives in
//! `pilot-transforms`; this module only defines the shapes so that every
//! crate (client, server, transforms, tests) agrees on them. Required versus
//! optional fields are expressed in the types themselves rather than checked
//! for presence at runtime.

use ndarray::{Array1, Array2, Array3};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A camera frame as captured by the robot runtime.
///
/// Upstream recorders disagree on both dtype and axis order: some store
/// float32 frames normalized to `[0, 1]`, some store uint8; some store
/// channel-first (CHW), some channel-last (HWC). The enum keeps both
/// representations transportable; the image normalizer resolves them into
/// the canonical uint8 HWC layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ImageFrame {
    /// An 8-bit frame, HWC or CHW.
    Uint8(Array3<u8>),
    /// A float frame assumed normalized to `[0, 1]`, HWC or CHW.
    Float32(Array3<f32>),
}

impl ImageFrame {
    /// The raw axis lengths of the frame, in stored order.
    pub fn dim(&self) -> (usize, usize, usize) {
        match self {
            ImageFrame::Uint8(a) => a.dim(),
            ImageFrame::Float32(a) => a.dim(),
        }
    }
}

/// A natural-language task instruction.
///
/// Some robot runtimes hand the instruction over as raw bytes; the input
/// transform decodes those to UTF-8 before the model sees them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Prompt {
    /// Already-decoded instruction text.
    Text(String),
    /// An undecoded byte string, expected to be UTF-8.
    Bytes(Vec<u8>),
}

/// One observation as produced by the robot control loop, per tick.
///
/// Single-use: built, serialized, transformed, and discarded per inference
/// call. The `actions` field only appears in training-time examples, where
/// the ground-truth action matrix rides along with the observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawObservation {
    /// Joint/gripper state vector in the robot's native dimensionality.
    pub state: Vec<f32>,
    /// Primary (scene) camera frame.
    pub image: ImageFrame,
    /// Optional wrist camera frame.
    pub wrist_image: Option<ImageFrame>,
    /// Optional task instruction.
    pub prompt: Option<Prompt>,
    /// Ground-truth actions (time-steps x robot DOF), training only.
    pub actions: Option<Array2<f32>>,
}

/// The fixed input layout the policy model consumes.
///
/// Invariant: the key sets of `images` and `image_masks` are identical and
/// fully determined by the active [`crate::ModelVariant`], never by how many
/// frames the raw observation supplied. Slots without a real frame carry an
/// all-zero image and (variant permitting) a `false` mask.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalInput {
    /// State vector padded with zeros to the model's action dimensionality.
    pub state: Array1<f32>,
    /// Camera frames keyed by canonical slot name, uint8 HWC.
    pub images: BTreeMap<String, Array3<u8>>,
    /// Per-slot flag: does the slot hold real image data?
    pub image_masks: BTreeMap<String, bool>,
    /// Ground-truth actions padded like `state`, training only.
    pub actions: Option<Array2<f32>>,
    /// Decoded task instruction.
    pub prompt: Option<String>,
}

/// The action chunk produced by one inference call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionResult {
    /// Actions, time-steps x action dimension. The server returns this
    /// truncated to the robot's real DOF count.
    pub actions: Array2<f32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::arr2;

    #[test]
    fn image_frame_dim_matches_storage_order() {
        let chw = ImageFrame::Float32(Array3::zeros((3, 8, 6)));
        assert_eq!(chw.dim(), (3, 8, 6));
        let hwc = ImageFrame::Uint8(Array3::zeros((8, 6, 3)));
        assert_eq!(hwc.dim(), (8, 6, 3));
    }

    #[test]
    fn observation_roundtrips_through_wire_codec() {
        let obs = RawObservation {
            state: vec![0.5; 16],
            image: ImageFrame::Uint8(Array3::zeros((4, 4, 3))),
            wrist_image: None,
            prompt: Some(Prompt::Bytes(b"fold the towel".to_vec())),
            actions: Some(arr2(&[[1.0_f32, 2.0], [3.0, 4.0]])),
        };
        let bytes = crate::codec::to_wire_bytes(&obs).unwrap();
        let back: RawObservation = crate::codec::from_wire_bytes(&bytes).unwrap();
        assert_eq!(back, obs);
    }
}
