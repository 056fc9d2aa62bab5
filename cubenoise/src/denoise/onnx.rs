use std::path::Path;

use ndarray::{Array4, Ix4};
use ort::session::Session;
use ort::value::Tensor;
use parking_lot::Mutex;

use super::DenoiseModel;
use crate::error::{Error, Result};

const INTRA_THREADS: usize = 4;

/// [`DenoiseModel`] backed by an ONNX Runtime session.
///
/// A session needs exclusive access to run, so concurrent `forward` calls queue on a mutex.
pub struct OnnxModel {
    session: Mutex<Session>,
}

impl OnnxModel {
    /// Loads pretrained weights from an `.onnx` file.
    ///
    /// Fails with [`Error::MissingModelArtifact`] when `path` does not exist.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::MissingModelArtifact {
                path: path.to_path_buf(),
            });
        }

        let session = Session::builder()
            .and_then(|b| b.with_intra_threads(INTRA_THREADS))
            .and_then(|b| b.commit_from_file(path))
            .map_err(|e| Error::Model(format!("failed to load '{}': {}", path.display(), e)))?;

        tracing::info!("Loaded ONNX model from {}", path.display());

        Ok(Self {
            session: Mutex::new(session),
        })
    }
}

impl DenoiseModel for OnnxModel {
    fn forward(&self, input: &Array4<f32>) -> Result<Array4<f32>> {
        let tensor = Tensor::from_array(input.clone()).map_err(model_error)?;

        let mut session = self.session.lock();
        let outputs = session.run(ort::inputs![tensor]).map_err(model_error)?;
        let output = outputs[0].try_extract_array::<f32>().map_err(model_error)?;

        output
            .to_owned()
            .into_dimensionality::<Ix4>()
            .map_err(model_error)
    }
}

fn model_error(e: impl std::fmt::Display) -> Error {
    Error::Model(e.to_string())
}
