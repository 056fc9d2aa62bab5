use std::sync::Arc;

use ndarray::Array4;

use crate::cubemap::{CubeFace, CubeFaces};
use crate::denoise::*;
use crate::image::{ChannelCount, Image, SampleType};
use crate::test_utils::{
    rgb_from_fn, solid_rgb, textured_faces, ConstantModel, CountingModel, FailingModel,
    IdentityModel, NanModel, UpscalingModel,
};

fn denoiser(model: impl DenoiseModel + 'static) -> FaceDenoiser {
    FaceDenoiser::new(Arc::new(model), DenoiseConfig::default())
}

fn gradient_face(size: u32) -> Image {
    rgb_from_fn(size, size, |x, y, c| (x * 8 + y * 3 + c * 20) as u8)
}

// =============================================================================
// Guards
// =============================================================================

#[test]
fn normalize_scales_byte_ranged_samples() {
    let mut samples = vec![0.0, 127.5, 255.0];
    normalize(&mut samples);
    assert_eq!(samples, vec![0.0, 0.5, 1.0]);
}

#[test]
fn normalize_is_noop_for_unit_range() {
    let original = vec![0.0, 0.25, 0.5, 0.75, 1.0];
    let mut samples = original.clone();
    normalize(&mut samples);
    assert_eq!(samples, original);

    normalize(&mut samples);
    assert_eq!(samples, original);
}

#[test]
fn normalize_clamps_negative_samples() {
    let mut samples = vec![-0.5, 0.5];
    normalize(&mut samples);
    assert_eq!(samples, vec![0.0, 0.5]);
}

#[test]
fn std_dev_is_population_std() {
    assert_eq!(std_dev(&[0.5; 16]), 0.0);
    assert!((std_dev(&[0.0, 1.0]) - 0.5).abs() < 1e-12);
    assert_eq!(std_dev(&[]), 0.0);
}

#[test]
fn flatness_uses_threshold() {
    assert!(is_flat(&[0.3; 10], DEFAULT_FLAT_STD_THRESHOLD));
    assert!(is_flat(&[0.3, 0.3005], DEFAULT_FLAT_STD_THRESHOLD));
    assert!(!is_flat(&[0.0, 0.01], DEFAULT_FLAT_STD_THRESHOLD));
    assert!(is_flat(&[], DEFAULT_FLAT_STD_THRESHOLD));
}

#[test]
fn all_finite_detects_nan_and_inf() {
    let mut tensor = Array4::<f32>::zeros((1, 3, 2, 2));
    assert!(all_finite(&tensor));

    tensor[[0, 1, 1, 0]] = f32::NAN;
    assert!(!all_finite(&tensor));

    tensor[[0, 1, 1, 0]] = f32::INFINITY;
    assert!(!all_finite(&tensor));
}

// =============================================================================
// Single face
// =============================================================================

#[test]
fn flat_face_passes_through_without_inference() {
    let model = Arc::new(CountingModel::default());
    let denoiser = FaceDenoiser::new(model.clone(), DenoiseConfig::default());
    let face = solid_rgb(16, 16, 77);

    let (out, outcome) = denoiser.denoise_with_outcome(&face);

    assert_eq!(outcome, DenoiseOutcome::Flat);
    assert_eq!(out, face);
    assert_eq!(model.calls(), 0);
}

#[test]
fn black_face_passes_through() {
    let face = solid_rgb(8, 8, 0);
    assert_eq!(denoiser(ConstantModel(0.5)).denoise(&face), face);
}

#[test]
fn nan_output_falls_back_to_input() {
    let face = gradient_face(16);
    let (out, outcome) = denoiser(NanModel).denoise_with_outcome(&face);

    assert_eq!(outcome, DenoiseOutcome::NonFinite);
    assert_eq!(out, face);
}

#[test]
fn model_error_falls_back_to_input() {
    let face = gradient_face(16);
    let (out, outcome) = denoiser(FailingModel).denoise_with_outcome(&face);

    assert_eq!(outcome, DenoiseOutcome::InferenceFailed);
    assert_eq!(out, face);
}

#[test]
fn wrong_output_shape_falls_back_to_input() {
    let face = gradient_face(8);
    let (out, outcome) = denoiser(UpscalingModel).denoise_with_outcome(&face);

    assert_eq!(outcome, DenoiseOutcome::InferenceFailed);
    assert_eq!(out, face);
}

#[test]
fn identity_model_reproduces_byte_face() {
    let face = gradient_face(16);
    let (out, outcome) = denoiser(IdentityModel).denoise_with_outcome(&face);

    assert_eq!(outcome, DenoiseOutcome::Denoised);
    assert_eq!(out, face);
}

#[test]
fn output_is_clamped_rounded_bytes() {
    let face = gradient_face(8);

    let half = denoiser(ConstantModel(0.5)).denoise(&face);
    assert_eq!(half.desc(), face.desc());
    assert!(half.as_u8().unwrap().iter().all(|&v| v == 128));

    let over = denoiser(ConstantModel(3.0)).denoise(&face);
    assert!(over.as_u8().unwrap().iter().all(|&v| v == 255));

    let under = denoiser(ConstantModel(-1.0)).denoise(&face);
    assert!(under.as_u8().unwrap().iter().all(|&v| v == 0));
}

#[test]
fn unit_float_face_becomes_bytes() {
    let data: Vec<f32> = (0..4 * 4).map(|i| i as f32 / 15.0).collect();
    let face = Image::from_f32(4, 4, ChannelCount::L, data.clone()).unwrap();

    let (out, outcome) = denoiser(IdentityModel).denoise_with_outcome(&face);

    assert_eq!(outcome, DenoiseOutcome::Denoised);
    assert_eq!(out.desc().color_format.sample_type, SampleType::U8);
    assert_eq!(out.channels(), 1);
    let expected: Vec<u8> = data.iter().map(|v| (v * 255.0).round() as u8).collect();
    assert_eq!(out.as_u8().unwrap(), expected.as_slice());
}

#[test]
fn tensor_is_channel_first() {
    struct ProbeModel;

    impl DenoiseModel for ProbeModel {
        fn forward(&self, input: &Array4<f32>) -> crate::error::Result<Array4<f32>> {
            assert_eq!(input.dim(), (1, 3, 2, 4));
            // Pixel (x=1, y=0) has red 10, green 20, blue 30.
            assert_eq!(input[[0, 0, 0, 1]], 10.0 / 255.0);
            assert_eq!(input[[0, 1, 0, 1]], 20.0 / 255.0);
            assert_eq!(input[[0, 2, 0, 1]], 30.0 / 255.0);
            Ok(input.clone())
        }
    }

    let face = rgb_from_fn(4, 2, |x, y, c| {
        if x == 1 && y == 0 {
            (10 * (c + 1)) as u8
        } else {
            200
        }
    });

    let (out, outcome) = denoiser(ProbeModel).denoise_with_outcome(&face);
    assert_eq!(outcome, DenoiseOutcome::Denoised);
    assert_eq!(out, face);
}

// =============================================================================
// All faces
// =============================================================================

#[test]
fn denoise_faces_preserves_order() {
    let faces = CubeFaces::new(textured_faces(12)).unwrap();

    for parallel in [false, true] {
        let config = DenoiseConfig {
            parallel,
            ..DenoiseConfig::default()
        };
        let result = FaceDenoiser::new(Arc::new(IdentityModel), config)
            .denoise_faces(&faces)
            .unwrap();

        assert_eq!(result.outcomes, [DenoiseOutcome::Denoised; 6]);
        for face in CubeFace::ALL {
            assert_eq!(result.faces[face], faces[face], "{} face moved", face);
        }
    }
}

#[test]
fn denoise_faces_reports_flat_faces() {
    let mut images = textured_faces(8);
    images[CubeFace::Up.index()] = solid_rgb(8, 8, 10);
    let faces = CubeFaces::new(images).unwrap();

    let model = Arc::new(CountingModel::default());
    let config = DenoiseConfig {
        parallel: true,
        ..DenoiseConfig::default()
    };
    let denoiser = FaceDenoiser::new(model.clone(), config);
    let result = denoiser.denoise_faces(&faces).unwrap();

    assert_eq!(model.calls(), 5);
    assert_eq!(result.outcomes[CubeFace::Up.index()], DenoiseOutcome::Flat);
    assert_eq!(result.faces[CubeFace::Up], faces[CubeFace::Up]);
    assert_eq!(
        result.outcomes.iter().filter(|o| o.is_passthrough()).count(),
        1
    );
}

#[test]
fn float_faces_with_passthrough_come_back_as_bytes() {
    let mut images: Vec<Image> = (0..6)
        .map(|i| {
            let data = (0..8 * 8 * 3)
                .map(|s| ((s * 7 + i * 13) % 64) as f32 / 63.0)
                .collect();
            Image::from_f32(8, 8, ChannelCount::Rgb, data).unwrap()
        })
        .collect();
    images[CubeFace::Up.index()] =
        Image::from_f32(8, 8, ChannelCount::Rgb, vec![0.5; 8 * 8 * 3]).unwrap();
    let faces = CubeFaces::new(images).unwrap();

    let result = denoiser(IdentityModel).denoise_faces(&faces).unwrap();

    assert_eq!(result.outcomes[CubeFace::Up.index()], DenoiseOutcome::Flat);
    assert_eq!(
        result.outcomes.iter().filter(|o| o.is_passthrough()).count(),
        1
    );
    for (face, image) in result.faces.iter() {
        assert_eq!(image.desc().color_format.sample_type, SampleType::U8, "{} face", face);
    }
    assert!(result.faces[CubeFace::Up].as_u8().unwrap().iter().all(|&v| v == 128));
    assert_eq!(
        result.faces[CubeFace::Front],
        faces[CubeFace::Front].to_u8_output()
    );
}

#[test]
fn non_finite_float_face_comes_back_as_bytes() {
    let data: Vec<f32> = (0..4 * 4).map(|i| i as f32 / 15.0).collect();
    let face = Image::from_f32(4, 4, ChannelCount::L, data).unwrap();
    let faces = CubeFaces::new(vec![face; 6]).unwrap();

    let result = denoiser(NanModel).denoise_faces(&faces).unwrap();

    assert_eq!(result.outcomes, [DenoiseOutcome::NonFinite; 6]);
    assert_eq!(result.faces[CubeFace::Down], faces[CubeFace::Down].to_u8_output());
}

#[cfg(feature = "onnx")]
#[test]
fn missing_onnx_file_is_reported() {
    let err = OnnxModel::load("models/does_not_exist.onnx").err().unwrap();
    assert!(matches!(err, crate::error::Error::MissingModelArtifact { .. }));
}
