//! Folder scanner for DSC files
//!
//! Discovers the DSC files below a directory and parses them concurrently on
//! tokio's blocking pool. One bad file never aborts the run (unless fail-fast
//! is configured): failures are collected alongside the parsed frames, which
//! are returned in chronological order.

use crate::app::models::{ParsedMetadata, sort_chronologically};
use crate::app::services::dsc_parser::DscParser;
use crate::config::ScanConfig;
use crate::error::DscError;
use crate::{Error, Result};
use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tokio::task;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// A DSC file that failed to parse
#[derive(Debug)]
pub struct ScanFailure {
    pub path: PathBuf,
    pub error: DscError,
}

impl ScanFailure {
    /// Short name of the failure kind (e.g. `InvalidChipId`)
    pub fn kind(&self) -> &'static str {
        self.error.kind()
    }
}

/// Statistics for one folder scan
#[derive(Debug, Clone, Default)]
pub struct ScanStats {
    pub files_discovered: usize,
    pub files_parsed: usize,
    pub files_failed: usize,
    pub elapsed: Duration,
}

impl ScanStats {
    /// Percentage of attempted files that parsed
    pub fn success_rate(&self) -> f64 {
        let attempted = self.files_parsed + self.files_failed;
        if attempted == 0 {
            0.0
        } else {
            (self.files_parsed as f64 / attempted as f64) * 100.0
        }
    }
}

/// Outcome of a folder scan
#[derive(Debug, Default)]
pub struct ScanResult {
    /// Parsed frames, earliest start time first
    pub frames: Vec<ParsedMetadata>,
    /// Failed files, sorted by path
    pub failures: Vec<ScanFailure>,
    pub stats: ScanStats,
}

/// Discover DSC files under `root` matching the configured pattern
///
/// Results are sorted by path and truncated to `max_files` when set.
pub fn discover_dsc_files(root: &Path, config: &ScanConfig) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        return Err(Error::configuration(format!(
            "Input path is not a directory: {}",
            root.display()
        )));
    }

    let pattern = config.compiled_pattern()?;
    let mut walker = WalkDir::new(root).follow_links(false);
    if !config.recursive {
        walker = walker.max_depth(1);
    }

    let mut files = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            // Only the root itself failing is fatal
            Err(e) if e.depth() == 0 => {
                return Err(Error::directory_traversal(
                    format!("Failed to read {}", root.display()),
                    e,
                ));
            }
            Err(e) => {
                warn!("Skipping unreadable entry under {}: {}", root.display(), e);
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let matches = entry
            .file_name()
            .to_str()
            .is_some_and(|name| pattern.matches(name));
        if matches {
            files.push(entry.into_path());
        }
    }

    files.sort();
    if let Some(max_files) = config.max_files {
        files.truncate(max_files);
    }

    debug!(
        "Discovered {} DSC files under {} (pattern '{}')",
        files.len(),
        root.display(),
        config.pattern
    );

    Ok(files)
}

/// Parses every DSC file in a folder with bounded concurrency
#[derive(Debug, Clone)]
pub struct FrameScanner {
    parser: DscParser,
    config: ScanConfig,
}

impl FrameScanner {
    /// Create a scanner, validating its configuration
    pub fn new(config: ScanConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            parser: DscParser::new(),
            config,
        })
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Discover and parse all DSC files under `root`
    pub async fn scan(&self, root: &Path) -> Result<ScanResult> {
        info!("Scanning {} for DSC files", root.display());
        let files = discover_dsc_files(root, &self.config)?;
        self.scan_files(files).await
    }

    /// Parse an explicit list of DSC files
    pub async fn scan_files(&self, files: Vec<PathBuf>) -> Result<ScanResult> {
        let start_time = Instant::now();
        let files_discovered = files.len();

        let progress_bar = if self.config.show_progress && !files.is_empty() {
            Some(create_progress_bar(files.len() as u64, "Parsing DSC files"))
        } else {
            None
        };

        let parser = self.parser;
        let mut outcomes = stream::iter(files)
            .map(move |file_path| {
                task::spawn_blocking(move || {
                    let result = parser.parse_file(&file_path);
                    (file_path, result)
                })
            })
            .buffer_unordered(self.config.workers);

        let mut frames = Vec::new();
        let mut failures = Vec::new();

        while let Some(joined) = outcomes.next().await {
            let (file_path, result) =
                joined.map_err(|e| Error::worker(format!("DSC parse task failed: {}", e)))?;

            if let Some(pb) = &progress_bar {
                pb.inc(1);
            }

            match result {
                Ok(metadata) => frames.push(metadata),
                Err(error) => {
                    warn!("Skipping {}: {}", file_path.display(), error);
                    if self.config.fail_fast {
                        if let Some(pb) = &progress_bar {
                            pb.abandon_with_message("Scan aborted");
                        }
                        return Err(error.into());
                    }
                    failures.push(ScanFailure {
                        path: file_path,
                        error,
                    });
                }
            }
        }

        if let Some(pb) = &progress_bar {
            pb.finish_with_message("All DSC files parsed");
        }

        sort_chronologically(&mut frames);
        failures.sort_by(|a, b| a.path.cmp(&b.path));

        let stats = ScanStats {
            files_discovered,
            files_parsed: frames.len(),
            files_failed: failures.len(),
            elapsed: start_time.elapsed(),
        };

        info!(
            "Parsed {} of {} DSC files in {:.2}s ({:.1}% success)",
            stats.files_parsed,
            stats.files_discovered,
            stats.elapsed.as_secs_f64(),
            stats.success_rate()
        );

        Ok(ScanResult {
            frames,
            failures,
            stats,
        })
    }
}

/// Create a progress bar with the standard style
pub fn create_progress_bar(total: u64, message: &str) -> ProgressBar {
    let pb = ProgressBar::new(total);
    let style = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}")
        .map(|style| style.progress_chars("#>-"))
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    pb.set_style(style);
    pb.set_message(message.to_string());
    pb
}
