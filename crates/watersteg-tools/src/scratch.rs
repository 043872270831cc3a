//! Scratch space for intermediate files.
//!
//! A [`Scratch`] owns a temporary directory. Everything written inside it is
//! deleted when the value is dropped, whichever way the owning operation
//! ends.

use std::path::{Path, PathBuf};

use tempfile::TempDir;
use watersteg_core::Result;

/// Temporary directory holding one operation's intermediate artifacts.
///
/// # Example
///
/// ```no_run
/// use watersteg_tools::Scratch;
///
/// let scratch = Scratch::new().unwrap();
/// let resized = scratch.file("resized.jpg");
/// // ... write `resized` with an external tool ...
/// drop(scratch); // `resized` is gone
/// ```
#[derive(Debug)]
pub struct Scratch {
    dir: TempDir,
}

impl Scratch {
    /// Create a fresh scratch directory under the system temp dir.
    pub fn new() -> Result<Self> {
        let dir = tempfile::Builder::new().prefix("watersteg-").tempdir()?;
        Ok(Self { dir })
    }

    /// Path to the scratch directory.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Path for a named file inside the scratch directory.
    pub fn file(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }
}
