//! Denoising of 360 degree equirectangular panoramas through cubemap faces.
//!
//! A panorama is resampled into six perspective faces, each face goes through
//! an image-restoration model, the faces are laid out as a cross and projected
//! back to equirectangular, and the result is alpha-blended with the source.

pub mod blend;
pub mod config;
pub mod cubemap;
pub mod denoise;
pub mod error;
pub mod image;
pub mod pipeline;
pub mod projection;

pub mod prelude;

#[cfg(test)]
mod test_utils;

pub use prelude::*;
