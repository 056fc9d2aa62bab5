//! End-to-end run: panorama -> faces -> denoised faces -> dice -> panorama -> blend.

mod artifacts;


use std::borrow::Cow;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

pub use artifacts::{
    format_alpha, ArtifactSink, FaceStage, FileArtifacts, NoArtifacts, DENOISED_FACES_DIR,
    RAW_FACES_DIR,
};

use crate::blend::{blend, BlendResult};
use crate::config::PipelineConfig;
use crate::cubemap::{CubeFaces, FACE_COUNT};
use crate::denoise::{DenoiseModel, DenoiseOutcome, FaceDenoiser};
use crate::error::Result;
use crate::image::{Image, Samples};
use crate::projection::{CubemapProjector, Projector};

/// Everything a run produced, in memory.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub faces: CubeFaces,
    pub denoised: CubeFaces,
    pub dice: Image,
    pub result: BlendResult,
    pub outcomes: [DenoiseOutcome; FACE_COUNT],
}

#[derive(Debug, Clone)]
pub struct RunReport {
    /// `None` when face dumps are disabled.
    pub raw_faces_dir: Option<PathBuf>,
    pub denoised_faces_dir: Option<PathBuf>,
    pub denoised_path: PathBuf,
    pub blended_path: PathBuf,
    pub outcomes: [DenoiseOutcome; FACE_COUNT],
    pub elapsed: Duration,
}

pub struct Pipeline {
    config: PipelineConfig,
    denoiser: FaceDenoiser,
    projector: Box<dyn Projector>,
}

impl Pipeline {
    /// Fails with [`crate::Error::InvalidParameter`] when `config` does not validate.
    pub fn new(
        config: PipelineConfig,
        model: Arc<dyn DenoiseModel>,
        projector: Box<dyn Projector>,
    ) -> Result<Self> {
        config.validate()?;
        let denoiser = FaceDenoiser::new(model, config.denoise);

        Ok(Self {
            config,
            denoiser,
            projector,
        })
    }

    /// [`Pipeline::new`] with a [`CubemapProjector`] using the configured interpolation.
    pub fn with_cubemap_projector(config: PipelineConfig, model: Arc<dyn DenoiseModel>) -> Result<Self> {
        let projector = CubemapProjector::new(config.cubemap.interpolation);
        Self::new(config, model, Box::new(projector))
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Reads the configured input, processes it and writes every artifact to disk.
    pub fn run(&self) -> Result<RunReport> {
        let start = Instant::now();
        let paths = &self.config.paths;

        tracing::info!("Reading input image: {}", paths.input.display());
        let panorama = Image::read_file(&paths.input)?;

        let sink = FileArtifacts::for_run(&self.config)?;
        let output = self.process(&panorama, &sink)?;

        let elapsed = start.elapsed();
        tracing::info!("Finished in {:.2?}", elapsed);

        let save_faces = sink.save_faces;
        Ok(RunReport {
            raw_faces_dir: save_faces.then(|| sink.raw_faces_dir.clone()),
            denoised_faces_dir: save_faces.then(|| sink.denoised_faces_dir.clone()),
            denoised_path: sink.denoised_path,
            blended_path: sink.blended_path,
            outcomes: output.outcomes,
            elapsed,
        })
    }

    /// Runs every stage on an in-memory panorama, handing intermediate
    /// images to `sink`. The first structural error aborts the run.
    ///
    /// Float panoramas are accepted; everything from the denoised faces on is 8-bit.
    pub fn process(&self, panorama: &Image, sink: &dyn ArtifactSink) -> Result<PipelineOutput> {
        let (height, width) = (panorama.height(), panorama.width());
        tracing::info!("Panorama {}", panorama.desc());

        let face_size = self.config.cubemap.face_size;
        tracing::info!("Projecting to cubemap faces of {}x{}", face_size, face_size);
        let faces = self.projector.erp_to_faces(panorama, face_size)?;
        sink.save_faces(FaceStage::Raw, &faces)?;

        let denoised = self.denoiser.denoise_faces(&faces)?;
        sink.save_faces(FaceStage::Denoised, &denoised.faces)?;

        tracing::info!("Reconstructing {}x{} panorama from dice layout", width, height);
        let dice = denoised.faces.to_dice()?;
        let reconstructed = self.projector.dice_to_erp(&dice, height, width)?;

        // The reconstruction is 8-bit; float panoramas are blended on the same scale.
        let original = match panorama.samples() {
            Samples::U8(_) => Cow::Borrowed(panorama),
            Samples::F32(_) => Cow::Owned(panorama.to_u8_output()),
        };

        tracing::info!("Blending with alpha {}", self.config.blend.alpha);
        let result = blend(&original, reconstructed, self.config.blend.alpha)?;
        sink.save_outputs(&result)?;

        Ok(PipelineOutput {
            faces,
            denoised: denoised.faces,
            dice,
            result,
            outcomes: denoised.outcomes,
        })
    }
}
