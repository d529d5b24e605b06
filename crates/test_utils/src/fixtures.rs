// Path: crates/test_utils/src/fixtures.rs

//! Randomly sampled robot observations, shaped like what a dual-arm
//! control loop actually sends.

use ndarray::Array3;
use pilot_types::{ImageFrame, Prompt, RawObservation};
use rand::Rng;

/// A random observation with full-size 224x224 camera frames.
pub fn sample_observation(dof: usize) -> RawObservation {
    sample_observation_sized(dof, 224, 224)
}

/// A random observation with frames of the given height/width. Small
/// frames keep protocol tests fast without changing any code path.
pub fn sample_observation_sized(dof: usize, height: usize, width: usize) -> RawObservation {
    let mut rng = rand::thread_rng();
    let state = (0..dof).map(|_| rng.gen::<f32>()).collect();
    let image = random_frame(&mut rng, height, width);
    let wrist_image = random_frame(&mut rng, height, width);
    RawObservation {
        state,
        image,
        wrist_image: Some(wrist_image),
        prompt: Some(Prompt::Text("perform manipulation task".to_string())),
        actions: None,
    }
}

fn random_frame<R: Rng>(rng: &mut R, height: usize, width: usize) -> ImageFrame {
    ImageFrame::Uint8(Array3::from_shape_fn((height, width, 3), |_| rng.gen::<u8>()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sampled_observation_has_requested_shape() {
        let obs = sample_observation_sized(16, 32, 24);
        assert_eq!(obs.state.len(), 16);
        assert_eq!(obs.image.dim(), (32, 24, 3));
        assert!(obs.wrist_image.is_some());
        assert!(obs.prompt.is_some());
        assert!(obs.actions.is_none());
    }
}
