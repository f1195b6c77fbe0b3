//! Fixtures for tests that exercise the process-wide client.
//!
//! The global client always connects to `./log.sock`, so these tests move the
//! process into a fresh temporary directory and bind listeners there. Tests
//! using them must be `#[serial]`: the working directory is process state.

use std::{env, path::PathBuf};

use rstest::fixture;
use tempfile::TempDir;

/// Temporary working directory, restored to the previous one on drop.
pub struct WorkingDir {
    // Removed after the previous directory is restored.
    _dir: TempDir,
    previous: PathBuf,
}

impl Drop for WorkingDir {
    fn drop(&mut self) {
        let _ = env::set_current_dir(&self.previous);
    }
}

/// Enter a fresh temporary directory with no client constructed yet.
#[fixture]
pub fn working_dir() -> WorkingDir {
    let previous = env::current_dir().expect("read working directory");
    let dir = tempfile::tempdir().expect("create temp dir");
    env::set_current_dir(dir.path()).expect("enter temp dir");
    unixlog::reset();
    WorkingDir {
        _dir: dir,
        previous,
    }
}
