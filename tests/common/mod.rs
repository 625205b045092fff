//! Common test utilities

use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Create a temporary project directory with a pl.yml file
pub fn create_test_tasks_file(content: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("pl.yml");
    fs::write(&path, content).unwrap();
    (temp_dir, path)
}
