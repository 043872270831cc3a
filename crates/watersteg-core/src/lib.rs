//! # watersteg-core
//!
//! Pieces of a watersteg run that never execute a process:
//!
//! - **Errors** ([`Error`]) -- the fatal failure modes of a run.
//! - **Source resolution** ([`source::SourceSpec`]) -- file, directory or
//!   wildcard pattern expanded into [`source::InputItem`]s.
//! - **Destination** ([`destination::Destination`]) -- the validated output
//!   directory.
//! - **Naming** ([`naming::names_for`]) -- the five output paths of an input.
//! - **Tool configuration** ([`config::ToolsConfig`]).

pub mod config;
pub mod destination;
pub mod error;
pub mod naming;
pub mod source;

pub use destination::Destination;
pub use error::{Error, Result};
pub use naming::{names_for, OutputFileSet, TransformKind};
pub use source::{InputItem, SourceKind, SourceSpec};
