//! # watersteg-tools
//!
//! External tool management for watersteg.
//!
//! - **Invocations** ([`ToolInvocation`]) -- program plus argument vector,
//!   never passed through a shell.
//! - **Execution** ([`ToolRunner`], [`SystemRunner`]) -- synchronous runs that
//!   report exit codes instead of failing on them.
//! - **Discovery** ([`ToolRegistry`]) -- locate `convert`, `identify`,
//!   `composite` and `steghide`, and probe that they run.
//! - **Scratch space** ([`Scratch`]) -- temporary directory removed on drop.
//!
//! With the `test-util` feature, `RecordingRunner` records invocations
//! instead of executing them.

pub mod command;
pub mod runner;
pub mod scratch;
pub mod tools;

// ---- Re-exports for convenience ----

pub use command::{StdoutMode, ToolInvocation, ToolOutput};
#[cfg(feature = "test-util")]
pub use runner::RecordingRunner;
pub use runner::{SystemRunner, ToolRunner};
pub use scratch::Scratch;
pub use tools::{Tool, ToolRegistry};
