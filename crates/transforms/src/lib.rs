// Path: crates/transforms/src/lib.rs
#![cfg_attr(
    not(test),
    deny(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        clippy::unimplemented,
        clippy::todo,
        clippy::indexing_slicing
    )
)]

//! # Pilot Transforms
//!
//! Maps robot-specific observations into the canonical multi-camera, padded
//! state layout the policy model consumes, and maps produced action chunks
//! back into the robot's native action space.
//!
//! The pipeline is deterministic and side-effect free: the same raw
//! observation and the same `(action_dim, variant)` configuration always
//! yield the same canonical input.

/// Normalization of arbitrary camera frames into uint8 HWC.
pub mod image;
/// The forward transform: raw observation to canonical input.
pub mod input;
/// The reverse transform: canonical action chunk to robot action space.
pub mod output;
/// Per-variant camera slot layout and masking tables.
pub mod variant;

pub use input::InputTransform;
pub use output::OutputTransform;
pub use variant::{slot_layout, CameraSlot, FrameSource};
