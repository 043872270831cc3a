//! The destination directory of a run.

use std::fmt;
use std::path::{Path, PathBuf, MAIN_SEPARATOR};

use crate::{Error, Result};

/// A destination directory that existed when the run started.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destination {
    path: PathBuf,
}

impl Destination {
    /// Check that `path` is an existing directory.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DestinationMissing`] otherwise.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if !path.is_dir() {
            return Err(Error::DestinationMissing(with_trailing_separator(&path)));
        }
        Ok(Self { path })
    }

    /// The directory path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", with_trailing_separator(&self.path).display())
    }
}

fn with_trailing_separator(path: &Path) -> PathBuf {
    let mut s = path.as_os_str().to_os_string();
    if !s.to_string_lossy().ends_with(MAIN_SEPARATOR) {
        s.push(MAIN_SEPARATOR.to_string());
    }
    PathBuf::from(s)
}
