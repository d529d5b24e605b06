// Path: crates/transforms/src/output.rs

//! The reverse transform: canonical action chunks back into the robot's
//! native action space.

use ndarray::s;
use pilot_types::error::TransformError;
use pilot_types::ActionResult;

/// Truncates model action chunks to the robot's real degree-of-freedom
/// count. Inference only; no padding happens on the way out.
#[derive(Debug, Clone, Copy)]
pub struct OutputTransform {
    robot_dof: usize,
}

impl OutputTransform {
    /// A transform keeping the first `robot_dof` action columns.
    pub fn new(robot_dof: usize) -> Self {
        Self { robot_dof }
    }

    /// Keeps the first `robot_dof` columns of every time-step.
    ///
    /// Asking for more columns than the chunk has is a hard failure rather
    /// than an implicit re-pad; it means the robot profile and the model
    /// configuration disagree.
    pub fn apply(&self, result: ActionResult) -> Result<ActionResult, TransformError> {
        let available = result.actions.ncols();
        if self.robot_dof > available {
            return Err(TransformError::TruncationOutOfRange {
                requested: self.robot_dof,
                available,
            });
        }
        Ok(ActionResult {
            actions: result.actions.slice(s![.., ..self.robot_dof]).to_owned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    #[test]
    fn keeps_first_dof_columns_across_all_rows() {
        let actions = Array2::from_shape_fn((50, 32), |(t, d)| (t * 100 + d) as f32);
        let out = OutputTransform::new(16)
            .apply(ActionResult {
                actions: actions.clone(),
            })
            .unwrap();
        assert_eq!(out.actions.dim(), (50, 16));
        assert_eq!(out.actions, actions.slice(s![.., ..16]).to_owned());
    }

    #[test]
    fn width_equal_to_dof_passes_through() {
        let actions = Array2::from_elem((10, 16), 2.0_f32);
        let out = OutputTransform::new(16)
            .apply(ActionResult {
                actions: actions.clone(),
            })
            .unwrap();
        assert_eq!(out.actions, actions);
    }

    #[test]
    fn requesting_more_columns_than_present_fails() {
        let err = OutputTransform::new(16)
            .apply(ActionResult {
                actions: Array2::zeros((10, 8)),
            })
            .unwrap_err();
        assert!(matches!(
            err,
            TransformError::TruncationOutOfRange {
                requested: 16,
                available: 8
            }
        ));
    }
}
