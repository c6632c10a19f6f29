//! Configuration management and validation.
//!
//! Provides the settings used when scanning folders of DSC files. Settings can
//! be loaded from a TOML file; command-line flags override them.

use crate::constants::{CONFIG_DIR_NAME, CONFIG_FILE_NAME, DEFAULT_DSC_PATTERN};
use crate::{Error, Result};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Settings for discovering and parsing DSC files in a folder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// File name pattern selecting DSC files (glob syntax)
    pub pattern: String,

    /// Descend into subdirectories
    pub recursive: bool,

    /// Number of files parsed concurrently
    pub workers: usize,

    /// Stop after this many files (sorted by path)
    pub max_files: Option<usize>,

    /// Abort the scan on the first file that fails to parse
    pub fail_fast: bool,

    /// Show a progress bar while scanning
    pub show_progress: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            pattern: DEFAULT_DSC_PATTERN.to_string(),
            recursive: true,
            workers: num_cpus::get(),
            max_files: None,
            fail_fast: false,
            show_progress: true,
        }
    }
}

impl ScanConfig {
    /// Parse configuration from TOML text; missing keys take defaults
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: ScanConfig = toml::from_str(text)
            .map_err(|e| Error::configuration(format!("Invalid configuration: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            Error::io(
                format!("Failed to read configuration file {}", path.display()),
                e,
            )
        })?;
        debug!("Loaded configuration from {}", path.display());
        Self::from_toml_str(&text)
    }

    /// Create configuration with custom worker count
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Create configuration with custom file pattern
    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = pattern.into();
        self
    }

    /// Enable or disable recursive discovery
    pub fn with_recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// Limit the number of files scanned
    pub fn with_max_files(mut self, max_files: usize) -> Self {
        self.max_files = Some(max_files);
        self
    }

    /// Enable fail-fast mode
    pub fn with_fail_fast(mut self) -> Self {
        self.fail_fast = true;
        self
    }

    /// Disable the progress bar
    pub fn without_progress(mut self) -> Self {
        self.show_progress = false;
        self
    }

    /// Compiled file name pattern
    pub fn compiled_pattern(&self) -> Result<glob::Pattern> {
        glob::Pattern::new(&self.pattern).map_err(|e| Error::pattern(self.pattern.clone(), e))
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(Error::configuration(
                "Number of workers must be greater than 0",
            ));
        }

        if self.max_files == Some(0) {
            return Err(Error::configuration(
                "Maximum file count must be greater than 0",
            ));
        }

        self.compiled_pattern()?;
        Ok(())
    }
}

/// Default configuration file location (`<config dir>/dsc-processor/config.toml`)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// Resolve which configuration file to use
///
/// An explicitly requested file must exist; the default location is used only
/// when present.
pub fn resolve_config_file(explicit: Option<&Path>) -> anyhow::Result<Option<PathBuf>> {
    if let Some(path) = explicit {
        let metadata = std::fs::metadata(path)
            .with_context(|| format!("Configuration file not found: {}", path.display()))?;
        if !metadata.is_file() {
            anyhow::bail!("Configuration path is not a file: {}", path.display());
        }
        return Ok(Some(path.to_path_buf()));
    }

    Ok(default_config_path().filter(|path| path.is_file()))
}
