//! Command-line interface.
//!
//! Every command runs against a resource directory on disk, chosen with
//! `--resources` or the `resources` configuration key.

mod commands;
mod output;

use clap::Parser;
pub use commands::Cli;
pub use commands::play::TerminalSink;
pub use commands::sets::{SetListing, SetReport, collect_sets, export_set, inspect_set};

use crate::error::ParrotBarError;

/// Parses the process arguments and runs the selected command.
///
/// # Errors
///
/// Returns an error if the command execution fails.
pub fn run() -> Result<(), ParrotBarError> {
    let cli = Cli::parse();
    cli.execute()
}
