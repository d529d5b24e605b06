// Path: crates/transforms/src/variant.rs

//! Static camera-slot layout tables, one per model variant.
//!
//! Keeping the slot order, frame assignment, and masking policy in data
//! rather than in branching code keeps the per-variant policy auditable in
//! one place and lets a new variant be added without touching the transform
//! itself.

use pilot_types::ModelVariant;

/// Where a camera slot's frame comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameSource {
    /// The primary (scene) camera.
    Base,
    /// The wrist camera, or an all-zero frame when the robot has none.
    Wrist,
    /// Always an all-zero padding frame.
    Padding,
}

/// One named model input stream and its fill/mask policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CameraSlot {
    /// The canonical input stream name the model expects.
    pub name: &'static str,
    /// Which frame fills the slot.
    pub source: FrameSource,
    /// The presence flag handed to the model for this slot.
    pub mask: bool,
}

const BASE_SLOTS: [CameraSlot; 3] = [
    CameraSlot {
        name: "base_0_rgb",
        source: FrameSource::Base,
        mask: true,
    },
    CameraSlot {
        name: "left_wrist_0_rgb",
        source: FrameSource::Wrist,
        mask: true,
    },
    CameraSlot {
        name: "right_wrist_0_rgb",
        source: FrameSource::Padding,
        mask: false,
    },
];

// FAST models are not sensitive to padding-image masking, so the padding
// slot keeps a true mask here.
const FAST_SLOTS: [CameraSlot; 3] = [
    CameraSlot {
        name: "base_0_rgb",
        source: FrameSource::Base,
        mask: true,
    },
    CameraSlot {
        name: "base_1_rgb",
        source: FrameSource::Padding,
        mask: true,
    },
    CameraSlot {
        name: "wrist_0_rgb",
        source: FrameSource::Wrist,
        mask: true,
    },
];

/// The slot table for a model variant. The slot set and order are fully
/// determined here, never by the frames a robot actually supplied.
pub fn slot_layout(variant: ModelVariant) -> &'static [CameraSlot; 3] {
    match variant {
        ModelVariant::Base => &BASE_SLOTS,
        ModelVariant::Fast => &FAST_SLOTS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_layout_masks_its_padding_slot() {
        let slots = slot_layout(ModelVariant::Base);
        assert_eq!(slots[0].name, "base_0_rgb");
        assert_eq!(slots[1].name, "left_wrist_0_rgb");
        assert_eq!(slots[2].name, "right_wrist_0_rgb");
        assert_eq!(slots[2].source, FrameSource::Padding);
        assert!(!slots[2].mask);
    }

    #[test]
    fn fast_layout_keeps_padding_slot_unmasked() {
        let slots = slot_layout(ModelVariant::Fast);
        assert_eq!(slots[1].source, FrameSource::Padding);
        assert!(slots[1].mask);
        assert_eq!(slots[2].source, FrameSource::Wrist);
        assert!(slots[2].mask);
    }

    #[test]
    fn slot_names_are_unique_per_variant() {
        for variant in [ModelVariant::Base, ModelVariant::Fast] {
            let slots = slot_layout(variant);
            let mut names: Vec<_> = slots.iter().map(|s| s.name).collect();
            names.dedup();
            assert_eq!(names.len(), 3);
        }
    }
}
