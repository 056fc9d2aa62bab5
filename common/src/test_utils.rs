use std::path::PathBuf;

/// Returns the workspace root (parent of the calling crate's manifest directory).
fn workspace_root() -> PathBuf {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    PathBuf::from(manifest_dir)
        .parent()
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| PathBuf::from(manifest_dir))
}

/// Returns `<workspace>/test_output/<name>`, creating `test_output` if needed.
pub fn test_output_path(name: &str) -> PathBuf {
    let dir = workspace_root().join("test_output");
    std::fs::create_dir_all(&dir).expect("Failed to create test_output directory");
    dir.join(name)
}

/// Returns an empty directory `<workspace>/test_output/<name>`, wiping any previous content.
pub fn fresh_test_dir(name: &str) -> PathBuf {
    let dir = test_output_path(name);
    if dir.exists() {
        std::fs::remove_dir_all(&dir).expect("Failed to clear test directory");
    }
    std::fs::create_dir_all(&dir).expect("Failed to create test directory");
    dir
}
