//! Structured description of one external tool invocation.

use std::ffi::{OsStr, OsString};
use std::fmt;
use std::path::{Path, PathBuf};

/// Where the standard output of a tool goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StdoutMode {
    /// Shared with the calling process.
    Inherit,
    /// Captured into [`ToolOutput::stdout`].
    Capture,
    /// Written to the given file, truncating it.
    File(PathBuf),
}

/// Output of a finished tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutput {
    /// Exit code, `None` if the process was killed by a signal.
    pub code: Option<i32>,
    /// Captured standard output (lossy UTF-8), empty unless captured.
    pub stdout: String,
}

impl ToolOutput {
    /// A zero exit with the given stdout.
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            code: Some(0),
            stdout: stdout.into(),
        }
    }

    /// A nonzero exit with no output.
    pub fn failed(code: i32) -> Self {
        Self {
            code: Some(code),
            stdout: String::new(),
        }
    }

    /// Whether the tool exited with status zero.
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// A program plus its argument vector.
///
/// Arguments are handed to the process as-is, never through a shell, so
/// passphrases, messages and file names may contain spaces and quotes.
///
/// # Example
///
/// ```
/// use watersteg_tools::ToolInvocation;
///
/// let mut inv = ToolInvocation::new("identify");
/// inv.args(["-format", "%wx%h"]).arg("my photo.jpg").capture_stdout();
/// assert_eq!(inv.to_string(), "identify -format %wx%h 'my photo.jpg'");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolInvocation {
    program: PathBuf,
    args: Vec<OsString>,
    stdout: StdoutMode,
}

impl ToolInvocation {
    /// Start an invocation of `program`.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            stdout: StdoutMode::Inherit,
        }
    }

    /// Append a single argument.
    pub fn arg(&mut self, s: impl AsRef<OsStr>) -> &mut Self {
        self.args.push(s.as_ref().to_os_string());
        self
    }

    /// Append multiple arguments.
    pub fn args(&mut self, iter: impl IntoIterator<Item = impl AsRef<OsStr>>) -> &mut Self {
        self.args
            .extend(iter.into_iter().map(|a| a.as_ref().to_os_string()));
        self
    }

    /// Capture stdout in memory.
    pub fn capture_stdout(&mut self) -> &mut Self {
        self.stdout = StdoutMode::Capture;
        self
    }

    /// Redirect stdout into `path`.
    pub fn stdout_to(&mut self, path: impl Into<PathBuf>) -> &mut Self {
        self.stdout = StdoutMode::File(path.into());
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Program file name, used in logs and error messages.
    pub fn name(&self) -> String {
        self.program
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.program.to_string_lossy().into_owned())
    }

    pub fn get_args(&self) -> &[OsString] {
        &self.args
    }

    /// Arguments as lossy strings.
    pub fn arg_strings(&self) -> Vec<String> {
        self.args
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }

    pub fn stdout_mode(&self) -> &StdoutMode {
        &self.stdout
    }
}

impl fmt::Display for ToolInvocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", quote(&self.program.to_string_lossy()))?;
        for arg in &self.args {
            write!(f, " {}", quote(&arg.to_string_lossy()))?;
        }
        if let StdoutMode::File(path) = &self.stdout {
            write!(f, " > {}", quote(&path.to_string_lossy()))?;
        }
        Ok(())
    }
}

/// Shell-style quoting for display only.
fn quote(s: &str) -> String {
    let plain = !s.is_empty()
        && s.chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./:%+=,@".contains(c));
    if plain {
        s.to_string()
    } else {
        format!("'{}'", s.replace('\'', r"'\''"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_collects_args() {
        let mut inv = ToolInvocation::new("/usr/bin/steghide");
        inv.arg("embed").args(["-cf", "in.jpg"]);
        assert_eq!(inv.name(), "steghide");
        assert_eq!(inv.arg_strings(), vec!["embed", "-cf", "in.jpg"]);
        assert_eq!(inv.stdout_mode(), &StdoutMode::Inherit);
    }

    #[test]
    fn display_quotes_user_values() {
        let mut inv = ToolInvocation::new("steghide");
        inv.args(["-p", "it's a secret", "-q"]);
        assert_eq!(inv.to_string(), r"steghide -p 'it'\''s a secret' -q");
    }

    #[test]
    fn display_shows_redirect() {
        let mut inv = ToolInvocation::new("convert");
        inv.arg("-version").stdout_to("/tmp/probe");
        assert_eq!(inv.to_string(), "convert -version > /tmp/probe");
    }

    #[test]
    fn empty_argument_is_visible() {
        let mut inv = ToolInvocation::new("echo");
        inv.arg("");
        assert_eq!(inv.to_string(), "echo ''");
    }

    #[test]
    fn output_success() {
        assert!(ToolOutput::ok("640x480").success());
        assert!(!ToolOutput::failed(1).success());
        let killed = ToolOutput {
            code: None,
            stdout: String::new(),
        };
        assert!(!killed.success());
    }
}
