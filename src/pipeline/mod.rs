//! The five transformations applied to every input.
//!
//! Each transformation is a short sequence of external tool calls. Any step
//! that changes pixels (resize, grayscale, overlay composite) finishes
//! writing its output before the steghide step of the same transformation
//! reads it: embedding first would be destroyed by the later rewrite.

pub mod payload;
pub mod transforms;

pub use payload::PayloadArtifact;
pub use transforms::apply;

use std::fmt;
use std::path::Path;

use watersteg_tools::{ToolRegistry, ToolRunner};

use crate::config::TransformConfig;
use crate::console::Console;

/// Everything a transformation reads, shared by the whole batch.
pub struct RunContext<'a> {
    pub runner: &'a dyn ToolRunner,
    pub tools: &'a ToolRegistry,
    pub settings: &'a TransformConfig,
    pub console: &'a Console,
    /// Text of the visible watermark.
    pub message: &'a str,
    pub passphrase: &'a str,
    pub overlay: &'a Path,
    /// The shared embed payload file.
    pub payload: &'a Path,
}

/// Result of one transformation of one input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransformOutcome {
    /// Every step exited with status zero.
    Completed,
    /// At least one step failed; this is the first one.
    Failed(StepFailure),
}

impl TransformOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, TransformOutcome::Completed)
    }
}

/// A step whose tool did not exit cleanly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepFailure {
    /// Step name within the transformation (e.g. `resize`, `embed`).
    pub step: &'static str,
    pub tool: String,
    /// Exit code; `None` when the tool was killed or never started.
    pub code: Option<i32>,
    pub detail: Option<String>,
}

impl fmt::Display for StepFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "step {} ({})", self.step, self.tool)?;
        match (&self.code, &self.detail) {
            (_, Some(detail)) => write!(f, ": {detail}"),
            (Some(code), None) => write!(f, " exited with status {code}"),
            (None, None) => write!(f, " was terminated"),
        }
    }
}

/// Pixel dimensions reported by `identify`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    /// Parse the first `WIDTHxHEIGHT` line of `identify -format` output.
    pub fn parse(output: &str) -> Option<Self> {
        let line = output.lines().map(str::trim).find(|l| !l.is_empty())?;
        let (w, h) = line.split_once('x')?;
        Some(Self {
            width: w.trim().parse().ok()?,
            height: h.trim().parse().ok()?,
        })
    }

    /// `-geometry` value anchoring an image of this size at the origin.
    pub fn at_origin(&self) -> String {
        format!("{self}+0+0")
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_dimensions() {
        assert_eq!(
            Dimensions::parse("640x480"),
            Some(Dimensions {
                width: 640,
                height: 480
            })
        );
        assert_eq!(
            Dimensions::parse("  1024x768\n"),
            Some(Dimensions {
                width: 1024,
                height: 768
            })
        );
    }

    #[test]
    fn parse_takes_first_frame() {
        let dims = Dimensions::parse("100x50\n90x40\n").unwrap();
        assert_eq!(dims.to_string(), "100x50");
    }

    #[test]
    fn parse_rejects_garbage() {
        assert_eq!(Dimensions::parse(""), None);
        assert_eq!(Dimensions::parse("identify: unable to open image"), None);
        assert_eq!(Dimensions::parse("640x"), None);
    }

    #[test]
    fn geometry_at_origin() {
        let dims = Dimensions {
            width: 640,
            height: 480,
        };
        assert_eq!(dims.at_origin(), "640x480+0+0");
    }

    #[test]
    fn failure_display() {
        let code = StepFailure {
            step: "embed",
            tool: "steghide".into(),
            code: Some(1),
            detail: None,
        };
        assert_eq!(code.to_string(), "step embed (steghide) exited with status 1");

        let spawn = StepFailure {
            step: "resize",
            tool: "convert".into(),
            code: None,
            detail: Some("failed to spawn".into()),
        };
        assert_eq!(spawn.to_string(), "step resize (convert): failed to spawn");
    }
}
