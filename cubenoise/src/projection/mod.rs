//! Equirectangular <-> cubemap resampling.

mod geometry;
mod sampling;


use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::cubemap::{split_dice, CubeFace, CubeFaces};
use crate::error::{Error, Result};
use crate::image::{ColorFormat, Image, ImageDesc, SampleType, Samples};

use sampling::{EdgeMode, Plane};

/// Converts between equirectangular panoramas and cube faces.
///
/// Faces are always produced and consumed in [`CubeFace`] order, and dice
/// images follow the layout of [`crate::cubemap::assemble_dice`].
pub trait Projector: Send + Sync {
    /// Renders the six `face_size` x `face_size` faces seen from the sphere center.
    fn erp_to_faces(&self, erp: &Image, face_size: u32) -> Result<CubeFaces>;

    /// Renders a `width` x `height` equirectangular panorama from a dice image.
    fn dice_to_erp(&self, dice: &Image, height: u32, width: u32) -> Result<Image>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Interpolation {
    Nearest,
    #[default]
    Bilinear,
}

/// CPU projector sampling with [`Interpolation`].
///
/// Panorama columns wrap around; rows and face edges clamp. 8-bit sources
/// produce rounded 8-bit output, float sources produce float output.
#[derive(Debug, Clone, Copy, Default)]
pub struct CubemapProjector {
    pub interpolation: Interpolation,
}

impl CubemapProjector {
    pub fn new(interpolation: Interpolation) -> Self {
        Self { interpolation }
    }
}

impl Projector for CubemapProjector {
    fn erp_to_faces(&self, erp: &Image, face_size: u32) -> Result<CubeFaces> {
        if face_size == 0 {
            return Err(Error::InvalidParameter("face size must be positive".to_string()));
        }
        if erp.width() == 0 || erp.height() == 0 {
            return Err(Error::ShapeMismatch(format!("empty panorama {}", erp.desc())));
        }

        let (erp_w, erp_h) = (erp.width(), erp.height());
        let source = Plane::from_image(erp);
        let channels = erp.channels();

        let faces = CubeFace::ALL
            .into_iter()
            .map(|face| {
                let samples = render(face_size, face_size, channels, |x, y, out| {
                    let dir = geometry::face_pixel_direction(face, x, y, face_size);
                    let (sx, sy) = geometry::erp_sample_coords(dir, erp_w, erp_h);
                    source.sample(sx, sy, EdgeMode::Wrap, EdgeMode::Clamp, self.interpolation, out);
                });
                to_image(face_size, face_size, erp.desc().color_format, samples)
            })
            .collect::<Result<Vec<_>>>()?;

        CubeFaces::new(faces)
    }

    fn dice_to_erp(&self, dice: &Image, height: u32, width: u32) -> Result<Image> {
        if height == 0 || width == 0 {
            return Err(Error::InvalidParameter(format!(
                "panorama size must be positive, got {}x{}",
                width, height
            )));
        }

        let faces = split_dice(dice)?;
        let face_size = faces.face_size();
        let planes: Vec<Plane> = faces.as_slice().iter().map(Plane::from_image).collect();

        let samples = render(width, height, dice.channels(), |x, y, out| {
            let dir = geometry::erp_pixel_direction(x, y, width, height);
            let (face, a, b) = geometry::locate_on_cube(dir);
            let (sx, sy) = geometry::face_sample_coords(a, b, face_size);
            planes[face.index()].sample(sx, sy, EdgeMode::Clamp, EdgeMode::Clamp, self.interpolation, out);
        });

        to_image(width, height, dice.desc().color_format, samples)
    }
}

/// Evaluates `pixel(x, y, out)` for every output pixel, rows in parallel.
fn render<F>(width: u32, height: u32, channels: usize, pixel: F) -> Vec<f32>
where
    F: Fn(u32, u32, &mut [f32]) + Sync,
{
    let row_len = width as usize * channels;
    let mut out = vec![0.0f32; row_len * height as usize];
    if row_len == 0 {
        return out;
    }

    out.par_chunks_mut(row_len)
        .enumerate()
        .for_each(|(y, row)| {
            for (x, px) in row.chunks_exact_mut(channels).enumerate() {
                pixel(x as u32, y as u32, px);
            }
        });

    out
}

fn to_image(width: u32, height: u32, format: ColorFormat, samples: Vec<f32>) -> Result<Image> {
    let samples = match format.sample_type {
        SampleType::U8 => Samples::U8(
            samples
                .into_iter()
                .map(|s| s.round().clamp(0.0, 255.0) as u8)
                .collect(),
        ),
        SampleType::F32 => Samples::F32(samples),
    };

    Image::new_with_samples(ImageDesc::new(width, height, format), samples)
}
