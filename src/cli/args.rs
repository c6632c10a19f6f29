//! Command-line argument definitions for the DSC processor
//!
//! This module defines the CLI interface using the clap derive API.

use crate::config::ScanConfig;
use crate::{Error, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// CLI arguments for the DSC processor
///
/// Reads the detector settings files that Pixelman writes next to every
/// Timepix frame, validating each field.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "dsc-processor",
    version,
    about = "Parse and validate Pixelman Timepix detector settings (DSC) files",
    long_about = "Reads the detector settings (DSC) files written by the Pixelman acquisition \
                  software alongside each Timepix frame. Every field is validated; the first \
                  malformed field rejects the file with a specific diagnostic."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands for the DSC processor
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Parse a single DSC file and print its metadata
    Inspect(InspectArgs),
    /// Parse every DSC file in a folder and list frames chronologically
    Scan(ScanArgs),
}

/// Arguments for the inspect command
#[derive(Debug, Clone, Parser)]
pub struct InspectArgs {
    /// DSC file to parse
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Output format for results
    #[arg(
        long = "output-format",
        value_enum,
        default_value = "human",
        help = "Output format for results"
    )]
    pub output_format: OutputFormat,

    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    #[arg(
        short = 'q',
        long = "quiet",
        help = "Suppress output except errors",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,
}

/// Arguments for the scan command
#[derive(Debug, Clone, Parser)]
pub struct ScanArgs {
    /// Folder containing DSC files
    #[arg(value_name = "DIR")]
    pub directory: PathBuf,

    /// Descend into subdirectories
    #[arg(
        short = 'r',
        long = "recursive",
        overrides_with = "no_recursive",
        help = "Descend into subdirectories"
    )]
    pub recursive: bool,

    /// Only scan the top-level folder
    #[arg(long = "no-recursive", help = "Only scan the top-level folder")]
    pub no_recursive: bool,

    /// File name pattern (glob syntax)
    ///
    /// Matched against file names only. Defaults to `*.dsc`.
    #[arg(
        short = 'p',
        long = "pattern",
        value_name = "GLOB",
        help = "File name pattern selecting DSC files"
    )]
    pub pattern: Option<String>,

    /// Number of files parsed concurrently
    #[arg(
        short = 'j',
        long = "workers",
        value_name = "COUNT",
        help = "Number of files parsed concurrently"
    )]
    pub workers: Option<usize>,

    /// Stop after this many files, taken in path order
    #[arg(
        long = "max-files",
        value_name = "COUNT",
        help = "Maximum number of files to scan"
    )]
    pub max_files: Option<usize>,

    /// Abort on the first file that fails to parse
    #[arg(long = "fail-fast", help = "Abort on the first malformed file")]
    pub fail_fast: bool,

    /// Path to configuration file
    ///
    /// TOML file with scan settings. If not specified, looks for
    /// `<config dir>/dsc-processor/config.toml`.
    #[arg(
        short = 'c',
        long = "config",
        value_name = "FILE",
        help = "Path to configuration file (TOML format)"
    )]
    pub config_file: Option<PathBuf>,

    #[arg(
        long = "output-format",
        value_enum,
        default_value = "human",
        help = "Output format for results"
    )]
    pub output_format: OutputFormat,

    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    #[arg(
        short = 'q',
        long = "quiet",
        help = "Suppress output except errors",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,
}

/// Output format options for results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON format for scripting
    Json,
}

/// Log level for a verbosity count, `quiet` taking precedence
fn log_level(verbose: u8, quiet: bool) -> &'static str {
    if quiet {
        "error"
    } else {
        match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

impl InspectArgs {
    pub fn validate(&self) -> Result<()> {
        if !self.file.is_file() {
            return Err(Error::configuration(format!(
                "Input file does not exist: {}",
                self.file.display()
            )));
        }
        Ok(())
    }

    /// Determine the appropriate log level based on verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        log_level(self.verbose, self.quiet)
    }
}

impl ScanArgs {
    /// Validate the scan command arguments for consistency
    pub fn validate(&self) -> Result<()> {
        if !self.directory.exists() {
            return Err(Error::configuration(format!(
                "Input path does not exist: {}",
                self.directory.display()
            )));
        }

        if !self.directory.is_dir() {
            return Err(Error::configuration(format!(
                "Input path is not a directory: {}",
                self.directory.display()
            )));
        }

        if self.workers == Some(0) {
            return Err(Error::configuration(
                "Number of workers must be greater than 0",
            ));
        }

        if self.max_files == Some(0) {
            return Err(Error::configuration(
                "Maximum file count must be greater than 0",
            ));
        }

        Ok(())
    }

    /// Determine the appropriate log level based on verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        log_level(self.verbose, self.quiet)
    }

    /// Check if we should show progress bars
    pub fn show_progress(&self) -> bool {
        !self.quiet && self.output_format == OutputFormat::Human
    }

    /// Apply command-line overrides on top of a base configuration
    pub fn apply_overrides(&self, mut config: ScanConfig) -> ScanConfig {
        if let Some(pattern) = &self.pattern {
            config = config.with_pattern(pattern.clone());
        }
        if self.recursive {
            config = config.with_recursive(true);
        } else if self.no_recursive {
            config = config.with_recursive(false);
        }
        if let Some(workers) = self.workers {
            config = config.with_workers(workers);
        }
        if let Some(max_files) = self.max_files {
            config = config.with_max_files(max_files);
        }
        if self.fail_fast {
            config = config.with_fail_fast();
        }
        if !self.show_progress() {
            config = config.without_progress();
        }
        config
    }
}
