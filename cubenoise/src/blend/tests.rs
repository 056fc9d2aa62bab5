use crate::blend::*;
use crate::error::Error;
use crate::image::{ChannelCount, Image};
use crate::test_utils::{rgb_from_fn, solid_rgb};

fn pattern(width: u32, height: u32) -> Image {
    rgb_from_fn(width, height, |x, y, c| ((x * 31 + y * 17 + c * 50) % 256) as u8)
}

#[test]
fn alpha_zero_yields_reconstruction() {
    let original = pattern(9, 5);
    let reconstructed = solid_rgb(9, 5, 42);

    let result = blend(&original, reconstructed.clone(), 0.0).unwrap();

    assert_eq!(result.blended, reconstructed);
    assert_eq!(result.reconstructed, reconstructed);
}

#[test]
fn alpha_one_yields_original() {
    let original = pattern(9, 5);
    let result = blend(&original, solid_rgb(9, 5, 42), 1.0).unwrap();

    assert_eq!(result.blended, original);
}

#[test]
fn default_alpha_mixes_and_truncates() {
    let original = solid_rgb(4, 3, 100);
    let reconstructed = solid_rgb(4, 3, 201);

    let result = blend(&original, reconstructed, DEFAULT_ALPHA).unwrap();

    // 100 * 0.3 + 201 * 0.7 = 170.7
    assert!(result.blended.as_u8().unwrap().iter().all(|&v| v == 170));
}

#[test]
fn float_reconstruction_is_clamped() {
    let original = solid_rgb(2, 2, 255);
    let reconstructed = Image::from_f32(2, 2, ChannelCount::Rgb, vec![400.0; 12]).unwrap();

    let result = blend(&original, reconstructed, 0.5).unwrap();

    assert!(result.blended.as_u8().unwrap().iter().all(|&v| v == 255));
}

#[test]
fn shape_mismatch_is_rejected() {
    let original = solid_rgb(4, 4, 0);

    let err = blend(&original, solid_rgb(4, 5, 0), 0.3).unwrap_err();
    assert!(matches!(err, Error::ShapeMismatch(_)));

    let gray = Image::from_u8(4, 4, ChannelCount::L, vec![0; 16]).unwrap();
    let err = blend(&original, gray, 0.3).unwrap_err();
    assert!(matches!(err, Error::ShapeMismatch(_)));
}

#[test]
fn alpha_out_of_range_is_rejected() {
    let image = solid_rgb(2, 2, 0);

    for alpha in [-0.1, 1.5, f32::NAN, f32::INFINITY] {
        let err = blend(&image, image.clone(), alpha).unwrap_err();
        assert!(matches!(err, Error::InvalidParameter(_)), "alpha {}", alpha);
    }
}
