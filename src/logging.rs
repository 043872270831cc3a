//! Logging initialization.
//!
//! Log output goes to stderr so it never interleaves with progress lines on
//! stdout. `RUST_LOG` overrides the default filter.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber.
///
/// Without `verbose` only warnings are shown: failed tool steps are
/// reported that way. With `verbose` the watersteg crates log at debug level.
pub fn init(verbose: bool) {
    let default_filter = if verbose {
        "watersteg=debug,watersteg_core=debug,watersteg_tools=debug"
    } else {
        "warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}
