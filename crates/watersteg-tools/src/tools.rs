//! External tool discovery and the availability probe.
//!
//! The [`ToolRegistry`] resolves where each program lives (config override,
//! then `PATH`) and hands out [`ToolInvocation`]s pointing at it.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use watersteg_core::config::ToolsConfig;
use watersteg_core::{Error, Result};

use crate::command::ToolInvocation;
use crate::runner::ToolRunner;

/// The external programs a run needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tool {
    /// ImageMagick `convert`.
    Convert,
    /// ImageMagick `identify`.
    Identify,
    /// ImageMagick `composite`.
    Composite,
    /// `steghide`.
    Steghide,
}

impl Tool {
    pub const ALL: [Tool; 4] = [Tool::Convert, Tool::Identify, Tool::Composite, Tool::Steghide];

    /// Tools probed before a run: one per external package.
    pub const PROBED: [Tool; 2] = [Tool::Convert, Tool::Steghide];

    /// Executable name looked up in `PATH`.
    pub fn binary(self) -> &'static str {
        match self {
            Tool::Convert => "convert",
            Tool::Identify => "identify",
            Tool::Composite => "composite",
            Tool::Steghide => "steghide",
        }
    }

    /// Argument that prints version information and exits zero.
    pub fn version_arg(self) -> &'static str {
        match self {
            Tool::Steghide => "--version",
            _ => "-version",
        }
    }

    /// Name used in user-facing messages.
    pub fn package(self) -> &'static str {
        match self {
            Tool::Steghide => "steghide",
            _ => "ImageMagick/convert",
        }
    }

    fn configured(self, config: &ToolsConfig) -> Option<&Path> {
        match self {
            Tool::Convert => config.convert_path.as_deref(),
            Tool::Identify => config.identify_path.as_deref(),
            Tool::Composite => config.composite_path.as_deref(),
            Tool::Steghide => config.steghide_path.as_deref(),
        }
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.binary())
    }
}

/// Resolved program paths for every [`Tool`].
#[derive(Debug, Clone)]
pub struct ToolRegistry {
    paths: HashMap<Tool, PathBuf>,
}

impl ToolRegistry {
    /// Resolve every tool.
    ///
    /// A configured path is used when it exists. Otherwise [`which::which`]
    /// searches `PATH`. A tool found nowhere keeps its bare binary name so
    /// the availability probe reports it.
    pub fn discover(config: &ToolsConfig) -> Self {
        let paths = Tool::ALL
            .into_iter()
            .map(|tool| {
                let path = match tool.configured(config) {
                    Some(p) if p.exists() => p.to_path_buf(),
                    Some(p) => {
                        tracing::warn!(
                            "configured path for {} does not exist: {:?}; searching PATH",
                            tool,
                            p
                        );
                        lookup(tool)
                    }
                    None => lookup(tool),
                };
                tracing::debug!(tool = %tool, path = ?path, "resolved tool");
                (tool, path)
            })
            .collect();

        Self { paths }
    }

    /// Registry that uses the bare binary names, leaving resolution to the
    /// operating system.
    pub fn bare() -> Self {
        Self {
            paths: Tool::ALL
                .into_iter()
                .map(|tool| (tool, PathBuf::from(tool.binary())))
                .collect(),
        }
    }

    /// Path used to run `tool`.
    pub fn path(&self, tool: Tool) -> &Path {
        self.paths
            .get(&tool)
            .map(PathBuf::as_path)
            .unwrap_or_else(|| Path::new(tool.binary()))
    }

    /// Start an invocation of `tool`.
    pub fn invocation(&self, tool: Tool) -> ToolInvocation {
        ToolInvocation::new(self.path(tool))
    }

    /// Probe the tools in [`Tool::PROBED`] order, stopping at the first one
    /// that does not run.
    ///
    /// Each probe's stdout goes to a temporary file that is removed when the
    /// probe ends.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ToolUnavailable`] naming the first failing tool, or
    /// [`Error::Io`] if the temporary file cannot be created.
    pub fn check_available(&self, runner: &dyn ToolRunner) -> Result<()> {
        let sink = tempfile::Builder::new()
            .prefix("watersteg-probe-")
            .tempfile()?;

        for tool in Tool::PROBED {
            let mut probe = self.invocation(tool);
            probe.arg(tool.version_arg()).stdout_to(sink.path());

            match runner.run(&probe) {
                Ok(output) if output.success() => {
                    tracing::debug!(tool = %tool, "tool available");
                }
                Ok(output) => {
                    tracing::debug!(tool = %tool, code = ?output.code, "version probe failed");
                    return Err(Error::unavailable(tool.package()));
                }
                Err(e) => {
                    tracing::debug!(tool = %tool, "version probe failed: {e}");
                    return Err(Error::unavailable(tool.package()));
                }
            }
        }
        Ok(())
    }
}

fn lookup(tool: Tool) -> PathBuf {
    which::which(tool.binary()).unwrap_or_else(|_| PathBuf::from(tool.binary()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{StdoutMode, ToolOutput};
    use parking_lot::Mutex;

    /// Answers probes by tool name and remembers what it saw.
    struct ProbeRunner {
        failing: Option<&'static str>,
        seen: Mutex<Vec<(String, PathBuf)>>,
    }

    impl ProbeRunner {
        fn new(failing: Option<&'static str>) -> Self {
            Self {
                failing,
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    impl ToolRunner for ProbeRunner {
        fn run(&self, invocation: &ToolInvocation) -> Result<ToolOutput> {
            let StdoutMode::File(sink) = invocation.stdout_mode() else {
                panic!("probe stdout should be redirected");
            };
            assert!(sink.exists());
            self.seen.lock().push((invocation.name(), sink.clone()));
            if self.failing == Some(invocation.name().as_str()) {
                Ok(ToolOutput::failed(127))
            } else {
                Ok(ToolOutput::ok(""))
            }
        }
    }

    #[test]
    fn discover_with_default_config() {
        let registry = ToolRegistry::discover(&ToolsConfig::default());
        for tool in Tool::ALL {
            assert!(registry.path(tool).ends_with(tool.binary()));
        }
    }

    #[test]
    fn configured_path_wins_when_present() {
        let fake = tempfile::NamedTempFile::new().unwrap();
        let config = ToolsConfig {
            steghide_path: Some(fake.path().to_path_buf()),
            ..Default::default()
        };
        let registry = ToolRegistry::discover(&config);
        assert_eq!(registry.path(Tool::Steghide), fake.path());
    }

    #[test]
    fn missing_configured_path_falls_back() {
        let config = ToolsConfig {
            convert_path: Some(PathBuf::from("/nonexistent/bin/convert")),
            ..Default::default()
        };
        let registry = ToolRegistry::discover(&config);
        assert_ne!(registry.path(Tool::Convert), Path::new("/nonexistent/bin/convert"));
    }

    #[test]
    fn all_probes_pass() {
        let runner = ProbeRunner::new(None);
        ToolRegistry::bare().check_available(&runner).unwrap();

        let seen = runner.seen.lock();
        let names: Vec<&str> = seen.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["convert", "steghide"]);
        for (_, sink) in seen.iter() {
            assert!(!sink.exists(), "probe sink should be removed");
        }
    }

    #[test]
    fn probing_stops_at_first_failure() {
        let runner = ProbeRunner::new(Some("convert"));
        let err = ToolRegistry::bare().check_available(&runner).unwrap_err();
        assert!(matches!(err, Error::ToolUnavailable { ref tool } if tool == "ImageMagick/convert"));

        let seen = runner.seen.lock();
        assert_eq!(seen.len(), 1);
        assert!(!seen[0].1.exists());
    }

    #[test]
    fn second_tool_failure_is_named() {
        let runner = ProbeRunner::new(Some("steghide"));
        let err = ToolRegistry::bare().check_available(&runner).unwrap_err();
        assert_eq!(err.to_string(), "steghide can't be found or doesn't run");
    }

    #[test]
    fn probe_uses_tool_specific_version_flag() {
        assert_eq!(Tool::Convert.version_arg(), "-version");
        assert_eq!(Tool::Steghide.version_arg(), "--version");
    }
}
