//! Alpha blending of the denoised reconstruction with the source panorama.

#[cfg(test)]
mod tests;

use rayon::prelude::*;

use crate::error::{Error, Result};
use crate::image::{ChannelCount, Image};

/// Weight of the original panorama in the blended output.
pub const DEFAULT_ALPHA: f32 = 0.3;

#[derive(Debug, Clone, PartialEq)]
pub struct BlendResult {
    pub reconstructed: Image,
    pub blended: Image,
}

/// `original * alpha + reconstructed * (1 - alpha)`, clamped to `[0, 255]`
/// and truncated to 8 bits.
///
/// Both images must agree in width, height and channel count; their sample
/// types may differ. `alpha` must lie in `[0, 1]`.
pub fn blend(original: &Image, reconstructed: Image, alpha: f32) -> Result<BlendResult> {
    if !alpha.is_finite() || !(0.0..=1.0).contains(&alpha) {
        return Err(Error::InvalidParameter(format!(
            "blend alpha must be in [0, 1], got {}",
            alpha
        )));
    }

    if !original.desc().same_shape(reconstructed.desc()) {
        return Err(Error::ShapeMismatch(format!(
            "cannot blend {} with {}",
            original.desc(),
            reconstructed.desc()
        )));
    }

    let alpha = alpha as f64;
    let a = original.to_f32_vec();
    let b = reconstructed.to_f32_vec();
    let row_len = original.desc().row_len();

    let mut out = vec![0u8; a.len()];
    if row_len > 0 {
        out.par_chunks_mut(row_len)
            .zip(a.par_chunks(row_len).zip(b.par_chunks(row_len)))
            .for_each(|(dst, (a, b))| {
                for ((d, &a), &b) in dst.iter_mut().zip(a).zip(b) {
                    let v = a as f64 * alpha + b as f64 * (1.0 - alpha);
                    *d = v.clamp(0.0, 255.0) as u8;
                }
            });
    }

    let channel_count = ChannelCount::from_count(original.channels()).ok_or_else(|| {
        Error::UnsupportedFormat(format!("{} channels", original.channels()))
    })?;
    let blended = Image::from_u8(original.width(), original.height(), channel_count, out)?;

    Ok(BlendResult {
        reconstructed,
        blended,
    })
}
