use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use cubenoise::prelude::*;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// YAML run configuration; defaults apply when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Equirectangular panorama to denoise
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Output base path; suffixes are appended to its stem
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// ONNX model weights
    #[arg(short, long)]
    model: Option<PathBuf>,

    /// Weight of the original panorama in the blend
    #[arg(short, long)]
    alpha: Option<f32>,

    /// Directory for log files
    #[arg(long, default_value = "log")]
    log_dir: PathBuf,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => PipelineConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => PipelineConfig::default(),
    };
    apply_overrides(&mut config, &args);
    config.validate().context("Invalid configuration")?;

    common::log_setup::setup_logging(&config.log_level, &args.log_dir)?;

    let model = OnnxModel::load(&config.paths.model).context("Failed to load denoising model")?;
    let pipeline = Pipeline::with_cubemap_projector(config, Arc::new(model))?;

    let report = pipeline
        .run()
        .with_context(|| format!("Failed to process {}", pipeline.config().paths.input.display()))?;

    let passthrough = report.outcomes.iter().filter(|o| o.is_passthrough()).count();
    tracing::info!(
        "Done in {:.2?}: {} of {} faces denoised",
        report.elapsed,
        FACE_COUNT - passthrough,
        FACE_COUNT
    );
    tracing::info!("Denoised panorama: {}", report.denoised_path.display());
    tracing::info!("Blended panorama: {}", report.blended_path.display());

    Ok(())
}

fn apply_overrides(config: &mut PipelineConfig, args: &Args) {
    if let Some(input) = &args.input {
        config.paths.input = input.clone();
    }
    if let Some(output) = &args.output {
        config.paths.output = output.clone();
    }
    if let Some(model) = &args.model {
        config.paths.model = model.clone();
    }
    if let Some(alpha) = args.alpha {
        config.blend.alpha = alpha;
    }
}
