//! Error handling for DSC parsing operations.
//!
//! Every validation failure has its own variant so callers can report exactly
//! which configuration value was rejected. Each variant carries the file path
//! and the offending text.

use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DscError {
    #[error("Cannot read DSC file {path}: {source}")]
    FileUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed frame {dimension} in {path}: {reason}")]
    MalformedDimensions {
        path: PathBuf,
        dimension: &'static str,
        reason: String,
    },

    #[error("Invalid chipboard ID '{value}' in {path}")]
    InvalidChipId { path: PathBuf, value: String },

    #[error("Invalid bias voltage '{value}' in {path} (expected 0.0 to 100.0 V)")]
    InvalidBiasVoltage { path: PathBuf, value: String },

    #[error("Invalid acquisition mode '{value}' in {path}")]
    InvalidAcquisitionMode { path: PathBuf, value: String },

    #[error("Invalid acquisition time '{value}' in {path}")]
    InvalidAcquisitionTime { path: PathBuf, value: String },

    #[error("Invalid hardware timer mode '{value}' in {path}")]
    InvalidHwTimerMode { path: PathBuf, value: String },

    #[error("Invalid Medipix type '{value}' in {path} (expected 1, 2 or 3)")]
    InvalidMedipixType { path: PathBuf, value: String },

    #[error("Invalid Medipix clock '{value}' in {path}")]
    InvalidMedipixClock { path: PathBuf, value: String },

    #[error("Invalid polarity '{value}' in {path} (expected 0 or 1)")]
    InvalidPolarity { path: PathBuf, value: String },

    #[error("Invalid Timepix clock mode '{value}' in {path} (expected 0 to 3)")]
    InvalidClockMode { path: PathBuf, value: String },

    #[error("Malformed Timepix clock field in {path}: {reason}")]
    MalformedClockField { path: PathBuf, reason: String },

    #[error("Invalid start time '{value}' in {path}")]
    InvalidStartTime { path: PathBuf, value: String },

    #[error("Malformed DAC block in {path}: {reason}")]
    MalformedDacBlock { path: PathBuf, reason: String },

    #[error("Label {label} at line {line} of {path} has no value line")]
    MissingValueLine {
        path: PathBuf,
        label: &'static str,
        line: usize,
    },
}

impl DscError {
    /// Short, stable name of the error kind
    pub fn kind(&self) -> &'static str {
        match self {
            DscError::FileUnreadable { .. } => "FileUnreadable",
            DscError::MalformedDimensions { .. } => "MalformedDimensions",
            DscError::InvalidChipId { .. } => "InvalidChipId",
            DscError::InvalidBiasVoltage { .. } => "InvalidBiasVoltage",
            DscError::InvalidAcquisitionMode { .. } => "InvalidAcquisitionMode",
            DscError::InvalidAcquisitionTime { .. } => "InvalidAcquisitionTime",
            DscError::InvalidHwTimerMode { .. } => "InvalidHwTimerMode",
            DscError::InvalidMedipixType { .. } => "InvalidMedipixType",
            DscError::InvalidMedipixClock { .. } => "InvalidMedipixClock",
            DscError::InvalidPolarity { .. } => "InvalidPolarity",
            DscError::InvalidClockMode { .. } => "InvalidClockMode",
            DscError::MalformedClockField { .. } => "MalformedClockField",
            DscError::InvalidStartTime { .. } => "InvalidStartTime",
            DscError::MalformedDacBlock { .. } => "MalformedDacBlock",
            DscError::MissingValueLine { .. } => "MissingValueLine",
        }
    }

    /// Path of the file that failed to parse
    pub fn path(&self) -> &Path {
        match self {
            DscError::FileUnreadable { path, .. }
            | DscError::MalformedDimensions { path, .. }
            | DscError::InvalidChipId { path, .. }
            | DscError::InvalidBiasVoltage { path, .. }
            | DscError::InvalidAcquisitionMode { path, .. }
            | DscError::InvalidAcquisitionTime { path, .. }
            | DscError::InvalidHwTimerMode { path, .. }
            | DscError::InvalidMedipixType { path, .. }
            | DscError::InvalidMedipixClock { path, .. }
            | DscError::InvalidPolarity { path, .. }
            | DscError::InvalidClockMode { path, .. }
            | DscError::MalformedClockField { path, .. }
            | DscError::InvalidStartTime { path, .. }
            | DscError::MalformedDacBlock { path, .. }
            | DscError::MissingValueLine { path, .. } => path,
        }
    }
}

pub type DscResult<T> = std::result::Result<T, DscError>;
