//! Scan command: parse every DSC file in a folder
//!
//! Frames are listed in chronological order; files that failed validation are
//! listed afterwards with the failure kind.

use super::shared::{load_scan_config, setup_logging};
use crate::app::models::ParsedMetadata;
use crate::app::services::frame_scanner::{FrameScanner, ScanResult};
use crate::cli::args::{OutputFormat, ScanArgs};
use crate::{Error, Result};
use colored::*;
use serde::Serialize;
use std::path::PathBuf;
use tracing::{debug, info};

/// Machine-readable scan report
#[derive(Debug, Serialize)]
pub struct ScanReport<'a> {
    pub frames: &'a [ParsedMetadata],
    pub failures: Vec<FailureReport>,
    pub files_discovered: usize,
    pub files_parsed: usize,
    pub files_failed: usize,
    pub elapsed_seconds: f64,
}

#[derive(Debug, Serialize)]
pub struct FailureReport {
    pub path: PathBuf,
    pub kind: &'static str,
    pub message: String,
}

impl<'a> ScanReport<'a> {
    pub fn from_result(result: &'a ScanResult) -> Self {
        Self {
            frames: &result.frames,
            failures: result
                .failures
                .iter()
                .map(|failure| FailureReport {
                    path: failure.path.clone(),
                    kind: failure.kind(),
                    message: failure.error.to_string(),
                })
                .collect(),
            files_discovered: result.stats.files_discovered,
            files_parsed: result.stats.files_parsed,
            files_failed: result.stats.files_failed,
            elapsed_seconds: result.stats.elapsed.as_secs_f64(),
        }
    }
}

pub async fn run_scan(args: ScanArgs) -> Result<ScanResult> {
    setup_logging(args.get_log_level(), args.quiet)?;
    args.validate()?;

    let config = load_scan_config(&args)?;
    debug!("Scan configuration: {:?}", config);

    let scanner = FrameScanner::new(config)?;
    let result = scanner.scan(&args.directory).await?;

    match args.output_format {
        OutputFormat::Human => print_scan_summary(&result),
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&ScanReport::from_result(&result))
                .map_err(|e| Error::serialization("Failed to serialize scan report", e))?;
            println!("{}", json);
        }
    }

    info!(
        "Scan complete: {} frames, {} failures",
        result.stats.files_parsed, result.stats.files_failed
    );

    Ok(result)
}

fn print_scan_summary(result: &ScanResult) {
    println!("{}", "Frames".bright_green().bold());
    for frame in &result.frames {
        println!(
            "  {}  {}  {}",
            frame
                .start_time_string()
                .unwrap_or("(no start time)")
                .bright_white(),
            frame.chipboard_id().unwrap_or("-").bright_cyan(),
            frame.frame_name()
        );
    }

    if !result.failures.is_empty() {
        println!("\n{}", "Failures".bright_red().bold());
        for failure in &result.failures {
            println!(
                "  {} {}",
                failure.kind().bright_red(),
                failure.error
            );
        }
    }

    let stats = &result.stats;
    println!("\n{}", "Scan Summary".bright_green().bold());
    println!(
        "  {} {}",
        "Files discovered:".bright_cyan(),
        stats.files_discovered.to_string().bright_white()
    );
    println!(
        "  {} {}",
        "Files parsed:".bright_cyan(),
        stats.files_parsed.to_string().bright_white().bold()
    );
    if stats.files_failed > 0 {
        println!(
            "  {} {}",
            "Files failed:".bright_red(),
            stats.files_failed.to_string().bright_red().bold()
        );
    }
    println!(
        "  {} {:.2}s",
        "Time elapsed:".bright_cyan(),
        stats.elapsed.as_secs_f64()
    );
}
