//! Configuration types shared between the tool layer and the application.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Overrides for the locations of the external programs.
///
/// Unset entries are looked up in `PATH`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    pub convert_path: Option<PathBuf>,
    pub identify_path: Option<PathBuf>,
    pub composite_path: Option<PathBuf>,
    pub steghide_path: Option<PathBuf>,
}
