//! Per-face denoising with numerical safety gates.
//!
//! A face goes through the model only when it carries signal. Flat faces,
//! model failures and non-finite outputs fall back to the input face, so a
//! bad face never aborts a run.

mod model;
#[cfg(feature = "onnx")]
mod onnx;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use ndarray::{Array3, Array4, Axis};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use strum_macros::Display;

pub use model::DenoiseModel;
#[cfg(feature = "onnx")]
pub use onnx::OnnxModel;

use crate::cubemap::{CubeFace, CubeFaces, FACE_COUNT};
use crate::error::{Error, Result};
use crate::image::{ChannelCount, Image};

/// Faces with a normalized standard deviation below this are passed through.
pub const DEFAULT_FLAT_STD_THRESHOLD: f64 = 1e-3;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DenoiseConfig {
    pub flat_std_threshold: f64,
    /// Run the six faces on the rayon pool instead of one after another.
    pub parallel: bool,
}

impl Default for DenoiseConfig {
    fn default() -> Self {
        Self {
            flat_std_threshold: DEFAULT_FLAT_STD_THRESHOLD,
            parallel: false,
        }
    }
}

/// Which branch [`FaceDenoiser::denoise_with_outcome`] took.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DenoiseOutcome {
    Denoised,
    Flat,
    NonFinite,
    InferenceFailed,
}

impl DenoiseOutcome {
    /// True when the input face was returned unchanged.
    pub fn is_passthrough(self) -> bool {
        self != DenoiseOutcome::Denoised
    }
}

#[derive(Debug, Clone)]
pub struct DenoisedFaces {
    pub faces: CubeFaces,
    pub outcomes: [DenoiseOutcome; FACE_COUNT],
}

pub struct FaceDenoiser {
    model: Arc<dyn DenoiseModel>,
    config: DenoiseConfig,
}

impl FaceDenoiser {
    pub fn new(model: Arc<dyn DenoiseModel>, config: DenoiseConfig) -> Self {
        Self { model, config }
    }

    pub fn config(&self) -> &DenoiseConfig {
        &self.config
    }

    /// Denoises one face. Never fails; see [`FaceDenoiser::denoise_with_outcome`].
    pub fn denoise(&self, face: &Image) -> Image {
        self.denoise_with_outcome(face).0
    }

    /// Denoises one face and reports the branch taken.
    ///
    /// The result is 8-bit with the input's channel count when the model
    /// ran, otherwise a copy of `face`.
    pub fn denoise_with_outcome(&self, face: &Image) -> (Image, DenoiseOutcome) {
        let mut samples = face.to_f32_vec();
        normalize(&mut samples);

        if is_flat(&samples, self.config.flat_std_threshold) {
            tracing::debug!("Face {} is flat, skipping inference", face.desc());
            return (face.clone(), DenoiseOutcome::Flat);
        }

        let output = match to_tensor(samples, face).and_then(|input| self.run_model(&input)) {
            Ok(output) => output,
            Err(err) => {
                tracing::warn!("Inference failed for face {}: {}", face.desc(), err);
                return (face.clone(), DenoiseOutcome::InferenceFailed);
            }
        };

        if !all_finite(&output) {
            tracing::debug!("Model produced non-finite values, keeping original face");
            return (face.clone(), DenoiseOutcome::NonFinite);
        }

        match to_face_image(&output) {
            Ok(image) => (image, DenoiseOutcome::Denoised),
            Err(err) => {
                tracing::warn!("Could not convert model output: {}", err);
                (face.clone(), DenoiseOutcome::InferenceFailed)
            }
        }
    }

    /// Denoises all six faces, on the rayon pool when [`DenoiseConfig::parallel`]
    /// is set. Slot `i` of the result always belongs to face `i`.
    ///
    /// Every result face is 8-bit: passthrough faces are brought to the output
    /// format with [`Image::to_u8_output`], so float input yields one uniform set.
    pub fn denoise_faces(&self, faces: &CubeFaces) -> Result<DenoisedFaces> {
        let denoise_one = |(face, image): (&CubeFace, &Image)| {
            tracing::info!("Denoising {} face", face);
            let (denoised, outcome) = self.denoise_with_outcome(image);
            if !outcome.is_passthrough() {
                return (denoised, outcome);
            }
            tracing::info!("{} face passed through ({})", face, outcome);
            (denoised.to_u8_output(), outcome)
        };

        let results: Vec<(Image, DenoiseOutcome)> = if self.config.parallel {
            CubeFace::ALL
                .par_iter()
                .zip(faces.as_slice())
                .map(denoise_one)
                .collect()
        } else {
            CubeFace::ALL
                .iter()
                .zip(faces.as_slice())
                .map(denoise_one)
                .collect()
        };

        let mut outcomes = [DenoiseOutcome::Denoised; FACE_COUNT];
        let mut images = Vec::with_capacity(FACE_COUNT);
        for (slot, (image, outcome)) in outcomes.iter_mut().zip(results) {
            *slot = outcome;
            images.push(image);
        }

        Ok(DenoisedFaces {
            faces: CubeFaces::new(images)?,
            outcomes,
        })
    }

    fn run_model(&self, input: &Array4<f32>) -> Result<Array4<f32>> {
        let output = self.model.forward(input)?;
        if output.shape() != input.shape() {
            return Err(Error::Model(format!(
                "expected output shape {:?}, got {:?}",
                input.shape(),
                output.shape()
            )));
        }

        Ok(output)
    }
}

/// Brings samples into `[0, 1]`: 8-bit ranged data (maximum above 1) is
/// scaled by 1/255, then everything is clamped. Data already in `[0, 1]`
/// is left untouched.
pub fn normalize(samples: &mut [f32]) {
    let max = samples.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    if max > 1.0 {
        samples.iter_mut().for_each(|s| *s /= 255.0);
    }
    samples.iter_mut().for_each(|s| *s = s.clamp(0.0, 1.0));
}

/// Population standard deviation, accumulated in `f64`.
pub fn std_dev(samples: &[f32]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }

    let n = samples.len() as f64;
    let mean = samples.iter().map(|&s| s as f64).sum::<f64>() / n;
    let variance = samples
        .iter()
        .map(|&s| {
            let d = s as f64 - mean;
            d * d
        })
        .sum::<f64>()
        / n;

    variance.sqrt()
}

/// A face with no spread carries nothing to denoise; empty faces count as flat.
pub fn is_flat(samples: &[f32], threshold: f64) -> bool {
    std_dev(samples) < threshold
}

pub fn all_finite(output: &Array4<f32>) -> bool {
    output.iter().all(|v| v.is_finite())
}

/// HWC samples to a standard-layout `1 x C x H x W` tensor.
fn to_tensor(samples: Vec<f32>, face: &Image) -> Result<Array4<f32>> {
    let (height, width, channels) = face.desc().shape();
    let hwc = Array3::from_shape_vec((height, width, channels), samples)
        .map_err(|e| Error::ShapeMismatch(e.to_string()))?;

    Ok(hwc
        .permuted_axes([2, 0, 1])
        .insert_axis(Axis(0))
        .as_standard_layout()
        .into_owned())
}

/// `1 x C x H x W` tensor in `[0, 1]` to a rounded 8-bit image.
fn to_face_image(output: &Array4<f32>) -> Result<Image> {
    let (_, channels, height, width) = output.dim();
    let channel_count = ChannelCount::from_count(channels).ok_or_else(|| {
        Error::UnsupportedFormat(format!("model returned {} channels", channels))
    })?;

    let hwc = output.index_axis(Axis(0), 0).permuted_axes([1, 2, 0]);
    let data: Vec<u8> = hwc
        .iter()
        .map(|&v| (v.clamp(0.0, 1.0) * 255.0).round() as u8)
        .collect();

    Image::from_u8(width as u32, height as u32, channel_count, data)
}
