use ndarray::Array4;

use crate::error::Result;

/// An image-restoration network.
///
/// Implementations must be callable from several threads; backends whose
/// execution context is not reentrant serialize calls internally.
pub trait DenoiseModel: Send + Sync {
    /// One forward pass over a `1 x C x H x W` batch with samples in `[0, 1]`.
    ///
    /// The result is expected in the same shape and range.
    fn forward(&self, input: &Array4<f32>) -> Result<Array4<f32>>;
}
