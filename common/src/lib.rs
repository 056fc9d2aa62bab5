pub mod file_utils;
pub mod float_ext;
pub mod log_setup;
pub mod test_utils;

/// Default absolute tolerance for [`float_ext::FloatExt::approximately_eq`].
pub const EPSILON: f64 = 1e-6;
