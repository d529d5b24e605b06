// Path: crates/transforms/src/image.rs

//! Camera frame normalization.

use ndarray::Array3;
use pilot_types::ImageFrame;

/// Converts an arbitrary camera frame into the canonical uint8 HWC layout.
///
/// Two normalizations are applied, matching what upstream datasets actually
/// store:
/// - float frames are assumed normalized to `[0, 1]` and rescaled by 255
///   with the fractional part truncated;
/// - a leading axis of length 3 is treated as channel-first (CHW) and
///   permuted to channel-last.
///
/// Nothing else is validated. A float frame outside `[0, 1]` saturates at
/// the cast, and a genuine HWC frame whose height happens to be 3 is
/// misread as CHW; both are accepted uncorrected by contract.
pub fn normalize_frame(frame: &ImageFrame) -> Array3<u8> {
    let image = match frame {
        ImageFrame::Uint8(a) => a.clone(),
        ImageFrame::Float32(a) => a.mapv(|v| (255.0 * v) as u8),
    };
    if image.dim().0 == 3 {
        image.permuted_axes([1, 2, 0]).as_standard_layout().to_owned()
    } else {
        image
    }
}

/// An all-zero frame with the same shape as `like`, used to fill camera
/// slots the robot did not supply.
pub fn zero_frame(like: &Array3<u8>) -> Array3<u8> {
    Array3::zeros(like.dim())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array3;

    #[test]
    fn float_frame_is_rescaled_and_truncated() {
        let frame = ImageFrame::Float32(Array3::from_elem((4, 5, 3), 0.5_f32));
        let out = normalize_frame(&frame);
        assert_eq!(out.dim(), (4, 5, 3));
        assert!(out.iter().all(|&v| v == 127));
    }

    #[test]
    fn float_rescale_matches_floor_of_255x() {
        let values = [0.0_f32, 0.1, 0.25, 0.999, 1.0];
        for &v in &values {
            let frame = ImageFrame::Float32(Array3::from_elem((4, 4, 3), v));
            let out = normalize_frame(&frame);
            assert_eq!(out[[0, 0, 0]], (255.0 * v) as u8, "value {}", v);
        }
    }

    #[test]
    fn channel_first_frame_is_permuted() {
        let mut chw = Array3::<u8>::zeros((3, 6, 4));
        chw[[0, 2, 1]] = 10;
        chw[[1, 2, 1]] = 20;
        chw[[2, 2, 1]] = 30;
        let out = normalize_frame(&ImageFrame::Uint8(chw));
        assert_eq!(out.dim(), (6, 4, 3));
        assert_eq!(out[[2, 1, 0]], 10);
        assert_eq!(out[[2, 1, 1]], 20);
        assert_eq!(out[[2, 1, 2]], 30);
    }

    #[test]
    fn channel_last_uint8_frame_passes_through() {
        let hwc = Array3::<u8>::from_elem((8, 8, 3), 42);
        let out = normalize_frame(&ImageFrame::Uint8(hwc.clone()));
        assert_eq!(out, hwc);
    }

    #[test]
    fn zero_frame_matches_shape() {
        let base = Array3::<u8>::from_elem((224, 224, 3), 9);
        let zeros = zero_frame(&base);
        assert_eq!(zeros.dim(), (224, 224, 3));
        assert!(zeros.iter().all(|&v| v == 0));
    }
}
