//! User-facing console output.
//!
//! Progress lines start with `~` and go to stdout; `--quiet` silences them.
//! Error lines start with `~ !!` and go to stderr; nothing silences them.
//! Debug echoes of tool commands (`@@`) are printed by the tool runner.

use std::fmt::Display;

const PROMPT: &str = "~";

#[derive(Debug, Clone, Copy, Default)]
pub struct Console {
    quiet: bool,
}

impl Console {
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }

    /// A top-level progress line.
    pub fn info(&self, msg: impl Display) {
        if !self.quiet {
            println!("{PROMPT} {msg}");
        }
    }

    /// An indented progress line for one output file.
    pub fn step(&self, msg: impl Display) {
        if !self.quiet {
            println!("     {PROMPT} ... {msg}");
        }
    }

    /// Program name and version.
    pub fn banner(&self) {
        if !self.quiet {
            println!("=== watersteg v. {} ===", env!("CARGO_PKG_VERSION"));
        }
    }

    pub fn error(&self, msg: impl Display) {
        eprintln!("{PROMPT} !! {msg}");
    }
}
