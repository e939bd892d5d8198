//! Shared test utilities for hassls.
//!
//! This module provides common helpers used across multiple test modules.
//! It is only compiled when running tests.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::error::{IncludeError, Result};
use crate::includes::{normalize_path, FileAccessor};

/// Creates a temporary workspace directory for testing.
///
/// Returns a tuple of (TempDir, PathBuf) where:
/// - TempDir: The temp directory handle (must be kept alive for the test duration)
/// - PathBuf: The path to the workspace subdirectory
///
/// Temp directories can live under hidden paths like `/tmp/.tmpXXXXX`, so
/// the workspace is a non-hidden `config` subdirectory.
pub fn create_test_workspace_dir() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let workspace_dir = temp_dir.path().join("config");
    fs::create_dir(&workspace_dir).expect("Failed to create workspace subdirectory");
    (temp_dir, workspace_dir)
}

/// Writes `files` (relative path, contents) below `root`, creating parent
/// folders as needed.
pub fn write_workspace_files(root: &Path, files: &[(&str, &str)]) {
    for (relative, contents) in files {
        let path = root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent folder");
        }
        fs::write(&path, contents).expect("Failed to write workspace file");
    }
}

/// In-memory [`FileAccessor`] for tests that need no real filesystem.
///
/// # Example
///
/// ```ignore
/// let accessor = MemoryFileAccessor::new("/config")
///     .with_file("/config/configuration.yaml", "automation: !include a.yaml")
///     .with_folder("/config/empty");
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryFileAccessor {
    root: PathBuf,
    files: BTreeMap<PathBuf, String>,
    folders: BTreeSet<PathBuf>,
}

impl MemoryFileAccessor {
    pub fn new(root: &str) -> MemoryFileAccessor {
        MemoryFileAccessor {
            root: PathBuf::from(root),
            ..Default::default()
        }
    }

    pub fn with_file(mut self, path: &str, contents: &str) -> MemoryFileAccessor {
        let path = normalize_path(&self.root, path);
        self.files.insert(path, contents.to_string());
        self
    }

    pub fn with_folder(mut self, path: &str) -> MemoryFileAccessor {
        self.folders.insert(normalize_path(&self.root, path));
        self
    }

    fn is_folder(&self, path: &Path) -> bool {
        self.folders.contains(path)
            || self
                .files
                .keys()
                .any(|file| file != path && file.starts_with(path))
    }
}

impl FileAccessor for MemoryFileAccessor {
    fn unified_path(&self, input: &str) -> PathBuf {
        normalize_path(&self.root, input)
    }

    async fn read_file(&self, path: &Path) -> Result<String> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| IncludeError::FileRead {
                path: path.to_path_buf(),
                source: io::Error::new(io::ErrorKind::NotFound, "no such file"),
            })
    }

    async fn list_files(&self, folder: &Path) -> Result<Vec<PathBuf>> {
        if !self.is_folder(folder) {
            return Err(IncludeError::FolderList {
                path: folder.to_path_buf(),
                source: io::Error::new(io::ErrorKind::NotFound, "no such folder"),
            });
        }

        Ok(self
            .files
            .keys()
            .filter(|file| *file != folder && file.starts_with(folder))
            .cloned()
            .collect())
    }
}
