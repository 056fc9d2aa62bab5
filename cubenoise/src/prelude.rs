// Error handling
pub use crate::error::{Error, Result};

// Images
pub use crate::image::{ChannelCount, ColorFormat, Image, ImageDesc, SampleType, Samples};

// Cube faces
pub use crate::cubemap::{assemble_dice, split_dice, CubeFace, CubeFaces, FACE_COUNT};

// Projection
pub use crate::projection::{CubemapProjector, Interpolation, Projector};

// Denoising
#[cfg(feature = "onnx")]
pub use crate::denoise::OnnxModel;
pub use crate::denoise::{DenoiseConfig, DenoiseModel, DenoiseOutcome, DenoisedFaces, FaceDenoiser};

// Blending
pub use crate::blend::{blend, BlendResult, DEFAULT_ALPHA};

// Pipeline
pub use crate::config::PipelineConfig;
pub use crate::pipeline::{
    ArtifactSink, FaceStage, FileArtifacts, NoArtifacts, Pipeline, PipelineOutput, RunReport,
};
