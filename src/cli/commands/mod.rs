//! Command implementations for the DSC processor CLI
//!
//! Each command is implemented in its own module.

pub mod inspect;
pub mod scan;
pub mod shared;

use crate::cli::args::{Args, Commands};
use crate::{Error, Result};

/// Main command runner
///
/// Dispatches to the handler for the selected subcommand:
/// - `inspect`: parse one DSC file and print its metadata
/// - `scan`: parse a folder of DSC files and list frames chronologically
pub async fn run(args: Args) -> Result<()> {
    match args.command {
        Some(Commands::Inspect(inspect_args)) => inspect::run_inspect(inspect_args).await,
        Some(Commands::Scan(scan_args)) => scan::run_scan(scan_args).await.map(|_| ()),
        None => Err(Error::configuration("No command given")),
    }
}
