#![allow(clippy::multiple_crate_versions)]

//! `parrotbar` command-line entry point.

use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

const DEFAULT_LOG_FILTER: &str = "warn,parrotbar_lib=info";

fn main() {
    init_tracing();

    if let Err(err) = parrotbar_lib::cli::run() {
        eprintln!("parrotbar: {err}");
        std::process::exit(1);
    }
}

/// Logs to stderr, filtered by `RUST_LOG`.
fn init_tracing() {
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()))
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .try_init();
}
