//! Path helpers for naming run artifacts.

use std::path::{Path, PathBuf};

/// Returns the file name of `path` without its extension.
pub fn file_stem(path: &Path) -> Option<&str> {
    path.file_stem().and_then(|os_str| os_str.to_str())
}

/// Builds `<dir of path>/<stem of path><suffix>.<extension>`.
///
/// A path without a usable stem keeps only the suffix as its name.
pub fn sibling_with_suffix(path: &Path, suffix: &str, extension: &str) -> PathBuf {
    let stem = file_stem(path).unwrap_or_default();
    let name = format!("{stem}{suffix}.{extension}");

    match path.parent() {
        Some(parent) => parent.join(name),
        None => PathBuf::from(name),
    }
}

/// Returns the lowercase extension of `path`, if any.
pub fn lowercase_extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|os_str| os_str.to_str())
        .map(|ext| ext.to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stem_strips_directory_and_extension() {
        assert_eq!(file_stem(Path::new("/data/pano_01.jpg")), Some("pano_01"));
        assert_eq!(file_stem(Path::new("pano")), Some("pano"));
    }

    #[test]
    fn sibling_keeps_parent_directory() {
        let path = sibling_with_suffix(Path::new("out/pano.jpg"), "_erp_denoised", "jpg");
        assert_eq!(path, PathBuf::from("out/pano_erp_denoised.jpg"));
    }

    #[test]
    fn sibling_of_bare_file_name() {
        let path = sibling_with_suffix(Path::new("pano.png"), "_blended_0.3", "jpg");
        assert_eq!(path, PathBuf::from("pano_blended_0.3.jpg"));
    }

    #[test]
    fn extension_is_lowercased() {
        assert_eq!(lowercase_extension(Path::new("a/B.JPG")).as_deref(), Some("jpg"));
        assert_eq!(lowercase_extension(Path::new("noext")), None);
    }
}
