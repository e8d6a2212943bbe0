use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// RAII guard for test .netrc files
///
/// Creates a temporary home directory holding a `.netrc` with the given
/// content. Code under test is pointed at [`home_dir`](Self::home_dir)
/// explicitly, so the process-wide `HOME` is never touched and tests can run
/// in parallel. The directory is removed when the guard is dropped.
pub struct NetrcGuard {
  temp_dir: TempDir,
  netrc_path: PathBuf,
}

impl NetrcGuard {
  /// Create a new NetrcGuard with the given content
  pub fn new(content: &str) -> Self {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let netrc_path = temp_dir.path().join(".netrc");

    let mut file = fs::File::create(&netrc_path).expect("Failed to create test .netrc");
    file.write_all(content.as_bytes()).expect("Failed to write test .netrc");

    Self { temp_dir, netrc_path }
  }

  /// Create a guard whose home has no .netrc at all
  pub fn empty_home() -> Self {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let netrc_path = temp_dir.path().join(".netrc");
    Self { temp_dir, netrc_path }
  }

  /// Get the path to the .netrc file
  pub fn netrc_path(&self) -> &Path {
    &self.netrc_path
  }

  /// Get the path to the temporary directory
  pub fn home_dir(&self) -> &Path {
    self.temp_dir.path()
  }
}
