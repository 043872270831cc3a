//! Batch orchestration: preconditions, the shared payload, and the
//! per-input loop.
//!
//! A run moves through
//! `destination check -> tool check -> payload written -> inputs -> payload removed`.
//! Only the first two checks (plus an unwritable payload file or an
//! unlistable source directory) stop it. A failed transformation is logged
//! and recorded in the [`RunReport`]; the input still counts as processed.

use std::path::PathBuf;

use watersteg_core::{names_for, Destination, Result, SourceKind, SourceSpec, TransformKind};
use watersteg_tools::{ToolRegistry, ToolRunner};

use crate::config::{Config, FailurePolicy};
use crate::console::Console;
use crate::pipeline::{self, PayloadArtifact, RunContext, StepFailure, TransformOutcome};

/// What the user asked for on the command line.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub passphrase: String,
    pub message: String,
    pub overlay: PathBuf,
}

/// One failed transformation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedTransform {
    pub input: PathBuf,
    pub kind: TransformKind,
    pub failure: StepFailure,
}

/// Summary of a finished run.
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    /// Inputs whose transformations were all attempted.
    pub processed: usize,
    pub failures: Vec<FailedTransform>,
}

/// Execute a whole run.
///
/// # Errors
///
/// - [`Error::DestinationMissing`](watersteg_core::Error::DestinationMissing) before anything else is checked.
/// - [`Error::ToolUnavailable`](watersteg_core::Error::ToolUnavailable) when a tool probe fails; nothing is written.
/// - [`Error::Io`](watersteg_core::Error::Io) if the payload file cannot be written or a
///   directory source cannot be listed.
pub fn run(
    options: &RunOptions,
    config: &Config,
    tools: &ToolRegistry,
    runner: &dyn ToolRunner,
    console: &Console,
) -> Result<RunReport> {
    let destination = Destination::open(&options.destination)?;
    let source = SourceSpec::classify(&options.source);

    console.banner();
    console.info(format!(
        "source=\"{}\" ({})",
        source.path().display(),
        source.kind()
    ));
    if let SourceKind::Pattern { .. } = source.kind() {
        console.info(format!(
            "source \"{}\" is neither an existing file nor an existing directory: \
             it will be read as a path with wildcards.",
            source.path().display()
        ));
    }
    console.info(format!("output path=\"{destination}\""));

    tools.check_available(runner)?;

    if !options.overlay.is_file() {
        tracing::warn!("overlay {:?} is not an existing file", options.overlay);
    }

    let payload = PayloadArtifact::create(&config.transform.payload_file, &options.message)?;
    let ctx = RunContext {
        runner,
        tools,
        settings: &config.transform,
        console,
        message: &options.message,
        passphrase: &options.passphrase,
        overlay: &options.overlay,
        payload: payload.path(),
    };

    let items = source.resolve()?;
    tracing::debug!("{} input(s) resolved from {:?}", items.len(), source.path());

    let mut report = RunReport::default();
    for item in &items {
        let outputs = names_for(destination.path(), &item.basename, &item.extension);
        for (kind, output) in outputs.iter() {
            let outcome = pipeline::apply(kind, &ctx, &item.path, output);
            if let TransformOutcome::Failed(failure) = outcome {
                tracing::warn!(
                    "{} failed for {:?}: {}",
                    kind.name(),
                    item.path,
                    failure
                );
                report.failures.push(FailedTransform {
                    input: item.path.clone(),
                    kind,
                    failure,
                });
                if config.transform.on_step_failure == FailurePolicy::SkipInput {
                    tracing::warn!("skipping remaining transformations for {:?}", item.path);
                    break;
                }
            }
        }
        report.processed += 1;
    }

    payload.remove();

    console.info(format!(
        "done with \"{}\": {} file(s) read and transformed.",
        source.path().display(),
        report.processed
    ));
    Ok(report)
}
