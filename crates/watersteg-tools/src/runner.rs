//! Process execution behind the [`ToolRunner`] seam.

use std::fs::File;
use std::process::{Command, Stdio};

use watersteg_core::{Error, Result};

use crate::command::{StdoutMode, ToolInvocation, ToolOutput};

/// Executes tool invocations synchronously.
///
/// A nonzero exit is not an error: it comes back in [`ToolOutput::code`] and
/// the caller decides what it means. `Err` is reserved for processes that
/// could not be started or waited on.
pub trait ToolRunner {
    fn run(&self, invocation: &ToolInvocation) -> Result<ToolOutput>;
}

/// Runs tools as child processes of the current process.
#[derive(Debug, Clone, Default)]
pub struct SystemRunner {
    echo: bool,
}

impl SystemRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Print every command line (prefixed with `@@`) before running it.
    pub fn echo_commands(mut self, echo: bool) -> Self {
        self.echo = echo;
        self
    }
}

impl ToolRunner for SystemRunner {
    fn run(&self, invocation: &ToolInvocation) -> Result<ToolOutput> {
        let name = invocation.name();
        if self.echo {
            println!("@@ run: {invocation}");
        }
        tracing::debug!(tool = %name, "run: {invocation}");

        let mut cmd = Command::new(invocation.program());
        cmd.args(invocation.get_args());
        cmd.stdin(Stdio::null());

        let output = match invocation.stdout_mode() {
            StdoutMode::Inherit => {
                let status = cmd
                    .status()
                    .map_err(|e| Error::tool(&name, format!("failed to spawn: {e}")))?;
                ToolOutput {
                    code: status.code(),
                    stdout: String::new(),
                }
            }
            StdoutMode::File(path) => {
                let file = File::create(path).map_err(|e| {
                    Error::tool(&name, format!("failed to open {}: {e}", path.display()))
                })?;
                let status = cmd
                    .stdout(Stdio::from(file))
                    .status()
                    .map_err(|e| Error::tool(&name, format!("failed to spawn: {e}")))?;
                ToolOutput {
                    code: status.code(),
                    stdout: String::new(),
                }
            }
            StdoutMode::Capture => {
                let output = cmd
                    .stdout(Stdio::piped())
                    .stderr(Stdio::inherit())
                    .output()
                    .map_err(|e| Error::tool(&name, format!("failed to spawn: {e}")))?;
                ToolOutput {
                    code: output.status.code(),
                    stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                }
            }
        };

        if !output.success() {
            tracing::debug!(tool = %name, code = ?output.code, "tool exited unsuccessfully");
        }
        Ok(output)
    }
}

#[cfg(feature = "test-util")]
pub use recording::RecordingRunner;

#[cfg(feature = "test-util")]
mod recording {
    use std::collections::HashMap;

    use parking_lot::Mutex;
    use watersteg_core::{Error, Result};

    use super::ToolRunner;
    use crate::command::{ToolInvocation, ToolOutput};

    type Hook = Box<dyn Fn(&ToolInvocation) + Send + Sync>;

    /// A [`ToolRunner`] that records invocations instead of running them.
    ///
    /// Every tool succeeds with empty stdout unless a response was scripted
    /// for its name with [`RecordingRunner::respond`] or
    /// [`RecordingRunner::unspawnable`].
    #[derive(Default)]
    pub struct RecordingRunner {
        calls: Mutex<Vec<ToolInvocation>>,
        responses: HashMap<String, ToolOutput>,
        unspawnable: Vec<String>,
        hook: Option<Hook>,
    }

    impl RecordingRunner {
        pub fn new() -> Self {
            Self::default()
        }

        /// Answer every invocation of `tool` with `output`.
        pub fn respond(mut self, tool: &str, output: ToolOutput) -> Self {
            self.responses.insert(tool.to_string(), output);
            self
        }

        /// Make every invocation of `tool` fail to spawn.
        pub fn unspawnable(mut self, tool: &str) -> Self {
            self.unspawnable.push(tool.to_string());
            self
        }

        /// Call `hook` with each invocation before answering it.
        pub fn on_run(mut self, hook: impl Fn(&ToolInvocation) + Send + Sync + 'static) -> Self {
            self.hook = Some(Box::new(hook));
            self
        }

        /// Everything run so far, in order.
        pub fn calls(&self) -> Vec<ToolInvocation> {
            self.calls.lock().clone()
        }

        /// Tool names run so far, in order.
        pub fn names(&self) -> Vec<String> {
            self.calls.lock().iter().map(ToolInvocation::name).collect()
        }
    }

    impl ToolRunner for RecordingRunner {
        fn run(&self, invocation: &ToolInvocation) -> Result<ToolOutput> {
            self.calls.lock().push(invocation.clone());
            if let Some(hook) = &self.hook {
                hook(invocation);
            }

            let name = invocation.name();
            if self.unspawnable.contains(&name) {
                return Err(Error::tool(name, "failed to spawn: not found"));
            }
            Ok(self
                .responses
                .get(&name)
                .cloned()
                .unwrap_or_else(|| ToolOutput::ok("")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(unix)]
    #[test]
    fn nonzero_exit_is_not_an_error() {
        let output = SystemRunner::new()
            .run(&ToolInvocation::new("false"))
            .unwrap();
        assert_eq!(output.code, Some(1));
        assert!(!output.success());
    }

    #[cfg(unix)]
    #[test]
    fn capture_keeps_arguments_intact() {
        let mut inv = ToolInvocation::new("printf");
        inv.args(["%s|", "two words", "it's \"quoted\""]).capture_stdout();
        let output = SystemRunner::new().run(&inv).unwrap();
        assert!(output.success());
        assert_eq!(output.stdout, "two words|it's \"quoted\"|");
    }

    #[cfg(unix)]
    #[test]
    fn stdout_redirected_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("out.txt");
        let mut inv = ToolInvocation::new("echo");
        inv.arg("hello").stdout_to(&target);

        let output = SystemRunner::new().run(&inv).unwrap();
        assert!(output.success());
        assert!(output.stdout.is_empty());
        assert_eq!(std::fs::read_to_string(&target).unwrap().trim(), "hello");
    }

    #[test]
    fn missing_program_is_an_error() {
        let result = SystemRunner::new().run(&ToolInvocation::new("nonexistent_tool_xyz_12345"));
        let err = result.unwrap_err();
        assert!(err.to_string().contains("nonexistent_tool_xyz_12345"));
    }
}
