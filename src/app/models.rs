//! Data models for DSC processing
//!
//! This module contains the record produced by parsing a Pixelman detector
//! settings (DSC) file, together with the small value types used inside it.

use crate::constants::{DAC_COUNT, DAC_NAMES};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::path::{Path, PathBuf};

// =============================================================================
// Enumerated Detector Settings
// =============================================================================

/// Medipix chip family declared by the `Mpx type` field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(i32)]
pub enum MpxType {
    /// Medipix 2.1
    Medipix21 = 1,

    /// Medipix MXR
    Mxr = 2,

    /// Timepix
    Timepix = 3,
}

impl MpxType {
    /// Human-readable chip family name
    pub fn description(self) -> &'static str {
        match self {
            MpxType::Medipix21 => "Medipix 2.1",
            MpxType::Mxr => "Medipix MXR",
            MpxType::Timepix => "Timepix",
        }
    }
}

impl TryFrom<i32> for MpxType {
    type Error = i32;

    fn try_from(value: i32) -> std::result::Result<Self, i32> {
        match value {
            1 => Ok(MpxType::Medipix21),
            2 => Ok(MpxType::Mxr),
            3 => Ok(MpxType::Timepix),
            other => Err(other),
        }
    }
}

impl From<MpxType> for i32 {
    fn from(mpx_type: MpxType) -> Self {
        mpx_type as i32
    }
}

/// Detector bias polarity declared by the `Polarity` field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(i32)]
pub enum Polarity {
    Negative = 0,
    Positive = 1,
}

impl TryFrom<i32> for Polarity {
    type Error = i32;

    fn try_from(value: i32) -> std::result::Result<Self, i32> {
        match value {
            0 => Ok(Polarity::Negative),
            1 => Ok(Polarity::Positive),
            other => Err(other),
        }
    }
}

impl From<Polarity> for i32 {
    fn from(polarity: Polarity) -> Self {
        polarity as i32
    }
}

impl std::fmt::Display for Polarity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Polarity::Negative => write!(f, "negative"),
            Polarity::Positive => write!(f, "positive"),
        }
    }
}

// =============================================================================
// DAC Values
// =============================================================================

/// The fourteen per-chip DAC settings in Pixelman order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DacValues([i32; DAC_COUNT]);

impl DacValues {
    pub fn new(values: [i32; DAC_COUNT]) -> Self {
        Self(values)
    }

    pub fn as_slice(&self) -> &[i32] {
        &self.0
    }

    /// Pairs of (DAC name, value) in file order
    pub fn named(&self) -> impl Iterator<Item = (&'static str, i32)> + '_ {
        DAC_NAMES.iter().copied().zip(self.0.iter().copied())
    }

    pub fn ikrum(&self) -> i32 {
        self.0[0]
    }

    pub fn disc(&self) -> i32 {
        self.0[1]
    }

    pub fn preamp(&self) -> i32 {
        self.0[2]
    }

    pub fn buff_analog_a(&self) -> i32 {
        self.0[3]
    }

    pub fn buff_analog_b(&self) -> i32 {
        self.0[4]
    }

    pub fn hist(&self) -> i32 {
        self.0[5]
    }

    /// Threshold (fine)
    pub fn thl(&self) -> i32 {
        self.0[6]
    }

    /// Threshold (coarse)
    pub fn thl_coarse(&self) -> i32 {
        self.0[7]
    }

    pub fn vcas(&self) -> i32 {
        self.0[8]
    }

    pub fn fbk(&self) -> i32 {
        self.0[9]
    }

    pub fn gnd(&self) -> i32 {
        self.0[10]
    }

    pub fn ths(&self) -> i32 {
        self.0[11]
    }

    pub fn bias_lvds(&self) -> i32 {
        self.0[12]
    }

    pub fn ref_lvds(&self) -> i32 {
        self.0[13]
    }
}

// =============================================================================
// Parsed Metadata Record
// =============================================================================

/// Fully validated contents of one DSC file
///
/// Produced only by [`DscParser`](crate::app::services::dsc_parser::DscParser).
/// Fields whose label never appears in the file are `None`; fields whose label
/// appears always hold a validated value, since any failure aborts the parse.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParsedMetadata {
    pub(crate) frame_width: u32,
    pub(crate) frame_height: u32,
    pub(crate) acquisition_mode: Option<i64>,
    pub(crate) acquisition_time_seconds: Option<f64>,
    pub(crate) chipboard_id: Option<String>,
    pub(crate) dac_values: Option<DacValues>,
    pub(crate) firmware_version: Option<String>,
    pub(crate) bias_voltage: Option<f64>,
    pub(crate) hw_timer_mode: Option<i64>,
    pub(crate) interface_name: Option<String>,
    pub(crate) mpx_clock_mhz: Option<f64>,
    pub(crate) mpx_type: Option<MpxType>,
    pub(crate) pixelman_version: Option<String>,
    pub(crate) polarity: Option<Polarity>,
    pub(crate) start_time_epoch: Option<f64>,
    pub(crate) start_time_string: Option<String>,
    pub(crate) tpx_clock_mhz: Option<f64>,
    pub(crate) name_and_serial_number: Option<String>,
    pub(crate) source_file_path: PathBuf,
    pub(crate) derived_data_file_path: PathBuf,
}

impl ParsedMetadata {
    /// Frame width in pixels (256..=1024)
    pub fn frame_width(&self) -> u32 {
        self.frame_width
    }

    /// Frame height in pixels (256..=1024)
    pub fn frame_height(&self) -> u32 {
        self.frame_height
    }

    pub fn acquisition_mode(&self) -> Option<i64> {
        self.acquisition_mode
    }

    /// Acquisition (shutter) time in seconds
    pub fn acquisition_time_seconds(&self) -> Option<f64> {
        self.acquisition_time_seconds
    }

    pub fn chipboard_id(&self) -> Option<&str> {
        self.chipboard_id.as_deref()
    }

    pub fn dac_values(&self) -> Option<&DacValues> {
        self.dac_values.as_ref()
    }

    pub fn firmware_version(&self) -> Option<&str> {
        self.firmware_version.as_deref()
    }

    /// Sensor bias voltage in volts (0.0..=100.0)
    pub fn bias_voltage(&self) -> Option<f64> {
        self.bias_voltage
    }

    pub fn hw_timer_mode(&self) -> Option<i64> {
        self.hw_timer_mode
    }

    pub fn interface_name(&self) -> Option<&str> {
        self.interface_name.as_deref()
    }

    pub fn mpx_clock_mhz(&self) -> Option<f64> {
        self.mpx_clock_mhz
    }

    pub fn mpx_type(&self) -> Option<MpxType> {
        self.mpx_type
    }

    pub fn pixelman_version(&self) -> Option<&str> {
        self.pixelman_version.as_deref()
    }

    pub fn polarity(&self) -> Option<Polarity> {
        self.polarity
    }

    /// Acquisition start as fractional seconds since the Unix epoch
    pub fn start_time_epoch(&self) -> Option<f64> {
        self.start_time_epoch
    }

    /// Start time in Pixelman layout, e.g. `Thu Jan 01 00:00:00.000000 1970`
    pub fn start_time_string(&self) -> Option<&str> {
        self.start_time_string.as_deref()
    }

    /// Timepix clock in MHz, whether stored as a code or directly
    pub fn tpx_clock_mhz(&self) -> Option<f64> {
        self.tpx_clock_mhz
    }

    pub fn name_and_serial_number(&self) -> Option<&str> {
        self.name_and_serial_number.as_deref()
    }

    /// The DSC file this record was parsed from
    pub fn source_file_path(&self) -> &Path {
        &self.source_file_path
    }

    /// The frame data file the DSC file describes (source path minus `.dsc`)
    pub fn derived_data_file_path(&self) -> &Path {
        &self.derived_data_file_path
    }

    // DAC aliases; all `None` when the file has no DAC block

    pub fn ikrum(&self) -> Option<i32> {
        self.dac_values.map(|d| d.ikrum())
    }

    pub fn disc(&self) -> Option<i32> {
        self.dac_values.map(|d| d.disc())
    }

    pub fn preamp(&self) -> Option<i32> {
        self.dac_values.map(|d| d.preamp())
    }

    pub fn buff_analog_a(&self) -> Option<i32> {
        self.dac_values.map(|d| d.buff_analog_a())
    }

    pub fn buff_analog_b(&self) -> Option<i32> {
        self.dac_values.map(|d| d.buff_analog_b())
    }

    pub fn hist(&self) -> Option<i32> {
        self.dac_values.map(|d| d.hist())
    }

    pub fn thl(&self) -> Option<i32> {
        self.dac_values.map(|d| d.thl())
    }

    pub fn thl_coarse(&self) -> Option<i32> {
        self.dac_values.map(|d| d.thl_coarse())
    }

    pub fn vcas(&self) -> Option<i32> {
        self.dac_values.map(|d| d.vcas())
    }

    pub fn fbk(&self) -> Option<i32> {
        self.dac_values.map(|d| d.fbk())
    }

    pub fn gnd(&self) -> Option<i32> {
        self.dac_values.map(|d| d.gnd())
    }

    pub fn ths(&self) -> Option<i32> {
        self.dac_values.map(|d| d.ths())
    }

    pub fn bias_lvds(&self) -> Option<i32> {
        self.dac_values.map(|d| d.bias_lvds())
    }

    pub fn ref_lvds(&self) -> Option<i32> {
        self.dac_values.map(|d| d.ref_lvds())
    }

    /// File name of the frame data file, used as the frame name in reports
    pub fn frame_name(&self) -> String {
        self.derived_data_file_path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .into_owned()
    }

    /// Total order by start time, ascending
    ///
    /// Not exposed as `PartialOrd`: records with equal start times compare
    /// `Equal` here while differing under `PartialEq`.
    ///
    /// Records without a start time sort before all others.
    pub fn chronological_cmp(&self, other: &Self) -> Ordering {
        match (self.start_time_epoch, other.start_time_epoch) {
            (Some(a), Some(b)) => a.total_cmp(&b),
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    }
}

/// Sort records in place by acquisition start time
pub fn sort_chronologically(records: &mut [ParsedMetadata]) {
    records.sort_by(ParsedMetadata::chronological_cmp);
}
