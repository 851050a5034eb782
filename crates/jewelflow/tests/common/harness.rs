//! Test harness for isolated store tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use tempfile::TempDir;

use jewelflow::{Config, JobStore, StoreOptions};

/// Temporary data directory plus helpers to open stores inside it.
pub struct TestHarness {
    /// Removed when the harness is dropped.
    temp_dir: TempDir,
    /// Path of the jobs file inside `temp_dir`.
    pub jobs_path: PathBuf,
}

impl TestHarness {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let jobs_path = temp_dir.path().join("data").join("jobs.csv");
        Self {
            temp_dir,
            jobs_path,
        }
    }

    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Opens (or reopens) the store at `jobs_path` with default options.
    pub fn open(&self) -> JobStore {
        JobStore::open(&self.jobs_path).expect("Failed to open store")
    }

    pub fn open_with(&self, options: StoreOptions) -> JobStore {
        JobStore::open_with(&self.jobs_path, options).expect("Failed to open store")
    }

    /// A config whose data directory is the harness root.
    pub fn config(&self) -> Config {
        Config {
            data_directory: self.root().join("data").to_string_lossy().into_owned(),
            ..Config::default()
        }
    }

    /// Writes `content` as the jobs file, creating the data directory.
    pub fn write_jobs_file(&self, content: &str) {
        if let Some(parent) = self.jobs_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create data directory");
        }
        std::fs::write(&self.jobs_path, content).expect("Failed to write jobs file");
    }

    pub fn read_jobs_file(&self) -> String {
        std::fs::read_to_string(&self.jobs_path).expect("Failed to read jobs file")
    }

    /// Writes `content` under the harness root and returns its path.
    pub fn write_file(&self, name: &str, content: &str) -> PathBuf {
        let path = self.root().join(name);
        std::fs::write(&path, content).expect("Failed to write file");
        path
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}
