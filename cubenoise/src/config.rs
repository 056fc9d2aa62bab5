//! Run configuration, loaded from YAML.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::blend::DEFAULT_ALPHA;
use crate::denoise::DenoiseConfig;
use crate::error::{Error, Result};
use crate::image::DEFAULT_JPEG_QUALITY;
use crate::projection::Interpolation;

pub const DEFAULT_FACE_SIZE: u32 = 512;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub paths: PathsConfig,
    pub cubemap: CubemapConfig,
    pub denoise: DenoiseConfig,
    pub blend: BlendConfig,
    pub output: OutputConfig,
    pub log_level: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Equirectangular panorama to denoise.
    pub input: PathBuf,
    /// Base name for the outputs; `_erp_denoised` and `_blended_<alpha>` are appended to its stem.
    pub output: PathBuf,
    pub model: PathBuf,
    /// Root for the per-face PNG dumps.
    pub artifacts_dir: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CubemapConfig {
    pub face_size: u32,
    pub interpolation: Interpolation,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlendConfig {
    pub alpha: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub save_faces: bool,
    pub jpeg_quality: u8,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            paths: PathsConfig::default(),
            cubemap: CubemapConfig::default(),
            denoise: DenoiseConfig::default(),
            blend: BlendConfig::default(),
            output: OutputConfig::default(),
            log_level: "info".to_string(),
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from("pano.jpg"),
            output: PathBuf::from("out/pano.jpg"),
            model: PathBuf::from("models/nafnet.onnx"),
            artifacts_dir: PathBuf::from("demo"),
        }
    }
}

impl Default for CubemapConfig {
    fn default() -> Self {
        Self {
            face_size: DEFAULT_FACE_SIZE,
            interpolation: Interpolation::default(),
        }
    }
}

impl Default for BlendConfig {
    fn default() -> Self {
        Self {
            alpha: DEFAULT_ALPHA,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            save_faces: true,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
        }
    }
}

impl PipelineConfig {
    /// Reads and validates a YAML config. Missing keys take their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let config = Self::from_yaml(&text).map_err(|source| Error::Config {
            path: path.to_path_buf(),
            source,
        })?;

        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml(text: &str) -> std::result::Result<Self, serde_yml::Error> {
        serde_yml::from_str(text)
    }

    pub fn to_yaml(&self) -> std::result::Result<String, serde_yml::Error> {
        serde_yml::to_string(self)
    }

    pub fn validate(&self) -> Result<()> {
        if self.cubemap.face_size == 0 {
            return Err(Error::InvalidParameter("cubemap.face_size must be positive".to_string()));
        }
        let alpha = self.blend.alpha;
        if !alpha.is_finite() || !(0.0..=1.0).contains(&alpha) {
            return Err(Error::InvalidParameter(format!(
                "blend.alpha must be in [0, 1], got {}",
                alpha
            )));
        }
        if !(1..=100).contains(&self.output.jpeg_quality) {
            return Err(Error::InvalidParameter(format!(
                "output.jpeg_quality must be in 1..=100, got {}",
                self.output.jpeg_quality
            )));
        }
        let threshold = self.denoise.flat_std_threshold;
        if !threshold.is_finite() || threshold < 0.0 {
            return Err(Error::InvalidParameter(format!(
                "denoise.flat_std_threshold must be a non-negative number, got {}",
                threshold
            )));
        }

        Ok(())
    }
}
