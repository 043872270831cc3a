//! The embed payload shared by every steghide call of a run.

use std::path::{Path, PathBuf};

/// File holding the message text for the lifetime of a run.
///
/// Written once before the first transformation and removed when
/// [`PayloadArtifact::remove`] is called or the value is dropped, whichever
/// comes first. Removal is best effort.
#[derive(Debug)]
pub struct PayloadArtifact {
    path: PathBuf,
    removed: bool,
}

impl PayloadArtifact {
    /// Write `message` to `path`, replacing any previous content.
    pub fn create(path: impl Into<PathBuf>, message: &str) -> std::io::Result<Self> {
        let path = path.into();
        std::fs::write(&path, message)?;
        tracing::debug!("wrote embed payload to {:?}", path);
        Ok(Self {
            path,
            removed: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Delete the payload file now.
    pub fn remove(mut self) {
        self.remove_file();
    }

    fn remove_file(&mut self) {
        if self.removed {
            return;
        }
        self.removed = true;
        match std::fs::remove_file(&self.path) {
            Ok(()) => tracing::debug!("removed embed payload {:?}", self.path),
            Err(e) => tracing::warn!("could not remove embed payload {:?}: {}", self.path, e),
        }
    }
}

impl Drop for PayloadArtifact {
    fn drop(&mut self) {
        self.remove_file();
    }
}
