use super::Interpolation;
use crate::image::Image;

/// How out-of-range pixel indices are folded back into the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum EdgeMode {
    /// Periodic, for the longitude axis of a panorama.
    Wrap,
    /// Repeat the border pixel.
    Clamp,
}

/// Float copy of an image for resampling.
pub(super) struct Plane {
    data: Vec<f32>,
    width: usize,
    height: usize,
    channels: usize,
}

impl Plane {
    pub(super) fn from_image(image: &Image) -> Self {
        Self {
            data: image.to_f32_vec(),
            width: image.width() as usize,
            height: image.height() as usize,
            channels: image.channels(),
        }
    }

    #[inline]
    fn pixel(&self, x: usize, y: usize) -> &[f32] {
        let start = (y * self.width + x) * self.channels;
        &self.data[start..start + self.channels]
    }

    /// Samples all channels at continuous pixel coordinates `(x, y)` into `out`.
    pub(super) fn sample(
        &self,
        x: f32,
        y: f32,
        x_edge: EdgeMode,
        y_edge: EdgeMode,
        interpolation: Interpolation,
        out: &mut [f32],
    ) {
        debug_assert_eq!(out.len(), self.channels);

        match interpolation {
            Interpolation::Nearest => {
                let ix = resolve(x.round() as i64, self.width, x_edge);
                let iy = resolve(y.round() as i64, self.height, y_edge);
                out.copy_from_slice(self.pixel(ix, iy));
            }
            Interpolation::Bilinear => {
                let x0f = x.floor();
                let y0f = y.floor();
                let fx = x - x0f;
                let fy = y - y0f;

                let x0 = resolve(x0f as i64, self.width, x_edge);
                let x1 = resolve(x0f as i64 + 1, self.width, x_edge);
                let y0 = resolve(y0f as i64, self.height, y_edge);
                let y1 = resolve(y0f as i64 + 1, self.height, y_edge);

                let p00 = self.pixel(x0, y0);
                let p10 = self.pixel(x1, y0);
                let p01 = self.pixel(x0, y1);
                let p11 = self.pixel(x1, y1);

                for (c, value) in out.iter_mut().enumerate() {
                    let top = p00[c] + fx * (p10[c] - p00[c]);
                    let bottom = p01[c] + fx * (p11[c] - p01[c]);
                    *value = top + fy * (bottom - top);
                }
            }
        }
    }
}

#[inline]
fn resolve(index: i64, len: usize, mode: EdgeMode) -> usize {
    let len = len as i64;
    match mode {
        EdgeMode::Wrap => index.rem_euclid(len) as usize,
        EdgeMode::Clamp => index.clamp(0, len - 1) as usize,
    }
}
