//! Unified error type for the watersteg crates.
//!
//! Everything that can stop a run before its inputs are touched funnels into
//! [`Error`]. Per-step tool failures are not errors: they are reported as
//! outcomes by the pipeline and never abort a batch.

use std::path::PathBuf;

/// Unified error type covering the fatal failure modes of a run.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The destination directory does not exist.
    #[error("the destination path \"{}\" doesn't exist", .0.display())]
    DestinationMissing(PathBuf),

    /// A required external tool could not be invoked.
    #[error("{tool} can't be found or doesn't run")]
    ToolUnavailable {
        /// Name of the tool that failed its probe.
        tool: String,
    },

    /// An external tool could not be spawned or waited on.
    #[error("Tool error [{tool}]: {message}")]
    Tool {
        /// Name of the tool that failed.
        tool: String,
        /// Human-readable error description.
        message: String,
    },

    /// An I/O operation failed.
    #[error("IO error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },
}

impl Error {
    /// Convenience constructor for [`Error::Tool`].
    pub fn tool(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Tool {
            tool: tool.into(),
            message: message.into(),
        }
    }

    /// Convenience constructor for [`Error::ToolUnavailable`].
    pub fn unavailable(tool: impl Into<String>) -> Self {
        Error::ToolUnavailable { tool: tool.into() }
    }
}

/// Result alias using the crate-level [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
