//! Log output for the CLI.
//!
//! Logs go to stderr so stdout carries only the compiled script.

use std::io;

use tracing::Level;
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

/// Picks the default level from `--quiet` / `--verbose`.
pub fn default_level(quiet: bool, verbose: bool) -> Level {
    if quiet {
        Level::ERROR
    } else if verbose {
        Level::DEBUG
    } else {
        Level::WARN
    }
}

/// Installs the global subscriber. `RUST_LOG` overrides the flag-derived level.
pub fn init_logging(quiet: bool, verbose: bool) {
    let level = default_level(quiet, verbose);
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.to_string()));

    let subscriber = tracing_subscriber::registry().with(filter).with(
        fmt::layer()
            .compact()
            .with_target(verbose)
            .with_writer(io::stderr),
    );
    let _ = tracing::subscriber::set_global_default(subscriber);
}
