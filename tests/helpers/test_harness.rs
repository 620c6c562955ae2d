use anyhow::Result;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

use codescope::clock::{Clock, ManualClock};
use codescope::{CodeSearcher, Config};

/// A scratch project directory plus a searcher with a controllable clock.
pub struct TestHarness {
    pub temp_dir: TempDir,
    pub config: Config,
    pub clock: Arc<ManualClock>,
    pub searcher: CodeSearcher,
}

impl TestHarness {
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let config = Config::default();
        let clock = Arc::new(ManualClock::new());
        let searcher = CodeSearcher::with_clock(&config, Arc::clone(&clock) as Arc<dyn Clock>);

        Ok(Self {
            temp_dir,
            config,
            clock,
            searcher,
        })
    }

    pub fn create_test_file(&self, path: &str, content: &str) -> Result<PathBuf> {
        let file_path = self.temp_dir.path().join(path);
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&file_path, content)?;
        Ok(file_path)
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// The project directory as a search scope.
    pub fn dirs(&self) -> Vec<PathBuf> {
        vec![self.temp_dir.path().to_path_buf()]
    }

    /// The project directory as a tool request scope.
    pub fn dir_strings(&self) -> Vec<String> {
        vec![self.temp_dir.path().display().to_string()]
    }
}

/// Path of a checked-in fixture file.
pub fn fixture(relative: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(relative)
}
