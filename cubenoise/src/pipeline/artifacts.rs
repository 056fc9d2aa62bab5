use std::path::{Path, PathBuf};

use common::file_utils::{file_stem, sibling_with_suffix};
use strum_macros::Display;

use crate::blend::BlendResult;
use crate::config::PipelineConfig;
use crate::cubemap::CubeFaces;
use crate::error::{Error, Result};

pub const RAW_FACES_DIR: &str = "cubemap_faces_raw";
pub const DENOISED_FACES_DIR: &str = "cubemap_faces_denoised";

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FaceStage {
    Raw,
    Denoised,
}

/// Receives the intermediate and final images of a run.
pub trait ArtifactSink {
    fn save_faces(&self, stage: FaceStage, faces: &CubeFaces) -> Result<()>;

    fn save_outputs(&self, result: &BlendResult) -> Result<()>;
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoArtifacts;

impl ArtifactSink for NoArtifacts {
    fn save_faces(&self, _stage: FaceStage, _faces: &CubeFaces) -> Result<()> {
        Ok(())
    }

    fn save_outputs(&self, _result: &BlendResult) -> Result<()> {
        Ok(())
    }
}

/// Writes faces as PNG under the artifacts directory and the two final
/// panoramas as JPEG next to the configured output path.
#[derive(Debug, Clone)]
pub struct FileArtifacts {
    pub raw_faces_dir: PathBuf,
    pub denoised_faces_dir: PathBuf,
    pub denoised_path: PathBuf,
    pub blended_path: PathBuf,
    pub save_faces: bool,
    pub jpeg_quality: u8,
}

impl FileArtifacts {
    pub fn for_run(config: &PipelineConfig) -> Result<Self> {
        let paths = &config.paths;
        let name = file_stem(&paths.input).ok_or_else(|| {
            Error::InvalidParameter(format!("input path has no file name: {}", paths.input.display()))
        })?;

        Ok(Self {
            raw_faces_dir: paths.artifacts_dir.join(RAW_FACES_DIR).join(name),
            denoised_faces_dir: paths.artifacts_dir.join(DENOISED_FACES_DIR).join(name),
            denoised_path: sibling_with_suffix(&paths.output, "_erp_denoised", "jpg"),
            blended_path: sibling_with_suffix(
                &paths.output,
                &format!("_blended_{}", format_alpha(config.blend.alpha)),
                "jpg",
            ),
            save_faces: config.output.save_faces,
            jpeg_quality: config.output.jpeg_quality,
        })
    }

    pub fn faces_dir(&self, stage: FaceStage) -> &Path {
        match stage {
            FaceStage::Raw => &self.raw_faces_dir,
            FaceStage::Denoised => &self.denoised_faces_dir,
        }
    }
}

impl ArtifactSink for FileArtifacts {
    fn save_faces(&self, stage: FaceStage, faces: &CubeFaces) -> Result<()> {
        if !self.save_faces {
            return Ok(());
        }

        let dir = self.faces_dir(stage);
        std::fs::create_dir_all(dir).map_err(|e| Error::io(dir, e))?;

        for (face, image) in faces.iter() {
            image.to_u8_output().save_file(dir.join(face.file_name()))?;
        }

        tracing::info!("Saved {} faces to {}", stage, dir.display());
        Ok(())
    }

    fn save_outputs(&self, result: &BlendResult) -> Result<()> {
        for (image, path) in [
            (&result.reconstructed, &self.denoised_path),
            (&result.blended, &self.blended_path),
        ] {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
            }
            image.save_jpeg(path, self.jpeg_quality)?;
            tracing::info!("Saved {}", path.display());
        }

        Ok(())
    }
}

/// Formats alpha for file names, always with a decimal point: `0.3`, `1.0`.
pub fn format_alpha(alpha: f32) -> String {
    let text = alpha.to_string();
    if text.contains('.') || !alpha.is_finite() {
        text
    } else {
        format!("{text}.0")
    }
}
