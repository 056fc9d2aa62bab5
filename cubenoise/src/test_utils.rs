//! Synthetic images and stub models shared by the unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};

use ndarray::Array4;

use crate::cubemap::FACE_COUNT;
use crate::denoise::DenoiseModel;
use crate::error::{Error, Result};
use crate::image::{ChannelCount, Image};

pub(crate) fn solid_rgb(width: u32, height: u32, value: u8) -> Image {
    let len = width as usize * height as usize * 3;
    Image::from_u8(width, height, ChannelCount::Rgb, vec![value; len]).unwrap()
}

/// Row-major RGB pixels produced by `f(x, y, channel)`.
pub(crate) fn rgb_from_fn(width: u32, height: u32, f: impl Fn(u32, u32, u32) -> u8) -> Image {
    let mut data = Vec::with_capacity(width as usize * height as usize * 3);
    for y in 0..height {
        for x in 0..width {
            for c in 0..3 {
                data.push(f(x, y, c));
            }
        }
    }
    Image::from_u8(width, height, ChannelCount::Rgb, data).unwrap()
}

/// Six RGB faces whose samples are nonzero and differ between faces.
pub(crate) fn labeled_faces(width: u32, height: u32) -> Vec<Image> {
    (0..FACE_COUNT as u32)
        .map(|face| {
            rgb_from_fn(width, height, |x, y, c| {
                ((face * 37 + y * 5 + x * 3 + c) % 250 + 1) as u8
            })
        })
        .collect()
}

/// Faces with visible texture, so none of them trips the flatness gate.
pub(crate) fn textured_faces(size: u32) -> Vec<Image> {
    labeled_faces(size, size)
}

/// Returns its input.
pub(crate) struct IdentityModel;

impl DenoiseModel for IdentityModel {
    fn forward(&self, input: &Array4<f32>) -> Result<Array4<f32>> {
        Ok(input.clone())
    }
}

/// Fills the output with one value.
pub(crate) struct ConstantModel(pub f32);

impl DenoiseModel for ConstantModel {
    fn forward(&self, input: &Array4<f32>) -> Result<Array4<f32>> {
        Ok(Array4::from_elem(input.dim(), self.0))
    }
}

/// Produces NaN everywhere.
pub(crate) struct NanModel;

impl DenoiseModel for NanModel {
    fn forward(&self, input: &Array4<f32>) -> Result<Array4<f32>> {
        Ok(Array4::from_elem(input.dim(), f32::NAN))
    }
}

pub(crate) struct FailingModel;

impl DenoiseModel for FailingModel {
    fn forward(&self, _input: &Array4<f32>) -> Result<Array4<f32>> {
        Err(Error::Model("backend unavailable".to_string()))
    }
}

/// Answers with a tensor twice as wide as the input.
pub(crate) struct UpscalingModel;

impl DenoiseModel for UpscalingModel {
    fn forward(&self, input: &Array4<f32>) -> Result<Array4<f32>> {
        let (n, c, h, w) = input.dim();
        Ok(Array4::zeros((n, c, h, w * 2)))
    }
}

/// Identity model that counts its calls.
#[derive(Default)]
pub(crate) struct CountingModel {
    calls: AtomicUsize,
}

impl CountingModel {
    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl DenoiseModel for CountingModel {
    fn forward(&self, input: &Array4<f32>) -> Result<Array4<f32>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(input.clone())
    }
}
