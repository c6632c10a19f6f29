//! Core DSC parser implementation
//!
//! Parsing runs in two passes over the file's lines:
//! 1. a positional pass reading the frame dimensions from line index 2;
//! 2. a label scan where each recognised label's value sits two lines below
//!    it, with the storage type on the line in between.
//!
//! The first invalid value aborts the parse; no partial record is returned.

use std::path::{Path, PathBuf};
use tracing::{debug, trace};

use super::field_parsers::{
    is_bias_voltage_valid, is_chip_id_valid, parse_dac_line, parse_dimension_token, parse_float,
    parse_int,
};
use super::labels::DscLabel;
use super::timestamp::pixelman_time_string;
use crate::app::models::{DacValues, MpxType, ParsedMetadata, Polarity};
use crate::constants::{
    DIMENSIONS_LINE_INDEX, DSC_SUFFIX_LEN, HEIGHT_TOKEN_INDEX, TYPE_LINE_OFFSET,
    VALUE_LINE_OFFSET, WIDTH_TOKEN_INDEX, storage_markers, tpx_clock_for_code,
};
use crate::error::{DscError, DscResult};

/// Parser for Pixelman detector settings (DSC) files
///
/// Stateless: every call reads its own file and returns an independently
/// owned record, so one parser can be shared freely across threads.
#[derive(Debug, Default, Clone, Copy)]
pub struct DscParser;

impl DscParser {
    pub fn new() -> Self {
        Self
    }

    /// Read and parse a DSC file
    pub fn parse_file(&self, file_path: &Path) -> DscResult<ParsedMetadata> {
        debug!("Parsing DSC file: {}", file_path.display());

        let content =
            std::fs::read_to_string(file_path).map_err(|source| DscError::FileUnreadable {
                path: file_path.to_path_buf(),
                source,
            })?;

        self.parse_str(&content, file_path)
    }

    /// Parse DSC content already held in memory
    ///
    /// `file_path` is recorded in the result and in any error; it is not read.
    pub fn parse_str(&self, content: &str, file_path: &Path) -> DscResult<ParsedMetadata> {
        let lines: Vec<&str> = content.lines().collect();

        let (frame_width, frame_height) = parse_dimensions(&lines, file_path)?;
        let mut builder = MetadataBuilder::new(file_path, frame_width, frame_height);

        for (index, line) in lines.iter().enumerate() {
            if let Some(label) = DscLabel::find(line) {
                trace!("Found label '{}' at line {}", label, index);
                let field = FieldLines {
                    lines: &lines,
                    index,
                    path: file_path,
                };
                builder.apply(label, &field)?;
            }
        }

        let metadata = builder.build();
        debug!(
            "Parsed {}: {}x{}, chip={:?}, start={:?}",
            file_path.display(),
            metadata.frame_width,
            metadata.frame_height,
            metadata.chipboard_id,
            metadata.start_time_string
        );

        Ok(metadata)
    }
}

/// Parse a DSC file with a default parser
pub fn parse(file_path: impl AsRef<Path>) -> DscResult<ParsedMetadata> {
    DscParser::new().parse_file(file_path.as_ref())
}

/// Extract width and height from the `key=value` tokens on line index 2
fn parse_dimensions(lines: &[&str], file_path: &Path) -> DscResult<(u32, u32)> {
    let malformed = |dimension: &'static str, reason: String| DscError::MalformedDimensions {
        path: file_path.to_path_buf(),
        dimension,
        reason,
    };

    let line = lines.get(DIMENSIONS_LINE_INDEX).ok_or_else(|| {
        malformed(
            "dimensions",
            format!("file has no line {}", DIMENSIONS_LINE_INDEX + 1),
        )
    })?;

    let tokens: Vec<&str> = line.trim().split(' ').collect();

    let width = parse_dimension_token(tokens.get(WIDTH_TOKEN_INDEX).copied())
        .map_err(|reason| malformed("width", reason))?;
    let height = parse_dimension_token(tokens.get(HEIGHT_TOKEN_INDEX).copied())
        .map_err(|reason| malformed("height", reason))?;

    Ok((width, height))
}

/// View of the lines around one matched label
struct FieldLines<'a> {
    lines: &'a [&'a str],
    index: usize,
    path: &'a Path,
}

impl<'a> FieldLines<'a> {
    fn line_at(&self, offset: usize) -> Option<&'a str> {
        self.lines.get(self.index + offset).map(|line| line.trim())
    }

    /// Trimmed value line; empty when the file ends before it
    fn value(&self) -> &'a str {
        self.line_at(VALUE_LINE_OFFSET).unwrap_or_default()
    }

    /// Trimmed value line for free-text fields, which have no other check
    fn required_text(&self, label: DscLabel) -> DscResult<String> {
        self.line_at(VALUE_LINE_OFFSET)
            .map(str::to_string)
            .ok_or_else(|| DscError::MissingValueLine {
                path: self.path.to_path_buf(),
                label: label.name(),
                line: self.index + 1,
            })
    }

    fn path(&self) -> PathBuf {
        self.path.to_path_buf()
    }
}

/// Accumulates fields during the label scan
struct MetadataBuilder {
    frame_width: u32,
    frame_height: u32,
    acquisition_mode: Option<i64>,
    acquisition_time_seconds: Option<f64>,
    chipboard_id: Option<String>,
    dac_values: Option<DacValues>,
    firmware_version: Option<String>,
    bias_voltage: Option<f64>,
    hw_timer_mode: Option<i64>,
    interface_name: Option<String>,
    mpx_clock_mhz: Option<f64>,
    mpx_type: Option<MpxType>,
    pixelman_version: Option<String>,
    polarity: Option<Polarity>,
    start_time_epoch: Option<f64>,
    start_time_string: Option<String>,
    tpx_clock_mhz: Option<f64>,
    name_and_serial_number: Option<String>,
    source_file_path: PathBuf,
}

impl MetadataBuilder {
    fn new(file_path: &Path, frame_width: u32, frame_height: u32) -> Self {
        Self {
            frame_width,
            frame_height,
            acquisition_mode: None,
            acquisition_time_seconds: None,
            chipboard_id: None,
            dac_values: None,
            firmware_version: None,
            bias_voltage: None,
            hw_timer_mode: None,
            interface_name: None,
            mpx_clock_mhz: None,
            mpx_type: None,
            pixelman_version: None,
            polarity: None,
            start_time_epoch: None,
            start_time_string: None,
            tpx_clock_mhz: None,
            name_and_serial_number: None,
            source_file_path: file_path.to_path_buf(),
        }
    }

    fn apply(&mut self, label: DscLabel, field: &FieldLines<'_>) -> DscResult<()> {
        let raw = field.value();

        match label {
            DscLabel::AcqMode => {
                let mode = parse_int(raw).ok_or_else(|| DscError::InvalidAcquisitionMode {
                    path: field.path(),
                    value: raw.to_string(),
                })?;
                self.acquisition_mode = Some(mode);
            }
            DscLabel::AcqTime => {
                let seconds = parse_float(raw).ok_or_else(|| DscError::InvalidAcquisitionTime {
                    path: field.path(),
                    value: raw.to_string(),
                })?;
                self.acquisition_time_seconds = Some(seconds);
            }
            DscLabel::ChipboardId => {
                if !is_chip_id_valid(raw) {
                    return Err(DscError::InvalidChipId {
                        path: field.path(),
                        value: raw.to_string(),
                    });
                }
                self.chipboard_id = Some(raw.to_string());
            }
            DscLabel::Dacs => {
                let dacs = parse_dac_line(raw).map_err(|reason| DscError::MalformedDacBlock {
                    path: field.path(),
                    reason,
                })?;
                self.dac_values = Some(dacs);
            }
            DscLabel::Firmware => {
                self.firmware_version = Some(field.required_text(label)?);
            }
            DscLabel::BiasVoltage => {
                let volts = parse_float(raw)
                    .filter(|volts| is_bias_voltage_valid(*volts))
                    .ok_or_else(|| DscError::InvalidBiasVoltage {
                        path: field.path(),
                        value: raw.to_string(),
                    })?;
                self.bias_voltage = Some(volts);
            }
            DscLabel::HwTimer => {
                let mode = parse_int(raw).ok_or_else(|| DscError::InvalidHwTimerMode {
                    path: field.path(),
                    value: raw.to_string(),
                })?;
                self.hw_timer_mode = Some(mode);
            }
            DscLabel::Interface => {
                self.interface_name = Some(field.required_text(label)?);
            }
            DscLabel::MpxClock => {
                let mhz = parse_float(raw).ok_or_else(|| DscError::InvalidMedipixClock {
                    path: field.path(),
                    value: raw.to_string(),
                })?;
                self.mpx_clock_mhz = Some(mhz);
            }
            DscLabel::MpxType => {
                let mpx_type = parse_int(raw)
                    .and_then(|code| i32::try_from(code).ok())
                    .and_then(|code| MpxType::try_from(code).ok())
                    .ok_or_else(|| DscError::InvalidMedipixType {
                        path: field.path(),
                        value: raw.to_string(),
                    })?;
                self.mpx_type = Some(mpx_type);
            }
            DscLabel::PixelmanVersion => {
                self.pixelman_version = Some(field.required_text(label)?);
            }
            DscLabel::Polarity => {
                let polarity = parse_int(raw)
                    .and_then(|code| i32::try_from(code).ok())
                    .and_then(|code| Polarity::try_from(code).ok())
                    .ok_or_else(|| DscError::InvalidPolarity {
                        path: field.path(),
                        value: raw.to_string(),
                    })?;
                self.polarity = Some(polarity);
            }
            DscLabel::StartTime => {
                let invalid = || DscError::InvalidStartTime {
                    path: field.path(),
                    value: raw.to_string(),
                };
                let epoch = parse_float(raw).ok_or_else(invalid)?;
                let time_string = pixelman_time_string(epoch).ok_or_else(invalid)?;
                self.start_time_epoch = Some(epoch);
                self.start_time_string = Some(time_string);
            }
            DscLabel::TpxClock => {
                self.tpx_clock_mhz = Some(parse_tpx_clock(field)?);
            }
            DscLabel::NameAndSerial => {
                self.name_and_serial_number = Some(field.required_text(label)?);
            }
        }

        Ok(())
    }

    fn build(self) -> ParsedMetadata {
        let derived_data_file_path = strip_dsc_suffix(&self.source_file_path);

        ParsedMetadata {
            frame_width: self.frame_width,
            frame_height: self.frame_height,
            acquisition_mode: self.acquisition_mode,
            acquisition_time_seconds: self.acquisition_time_seconds,
            chipboard_id: self.chipboard_id,
            dac_values: self.dac_values,
            firmware_version: self.firmware_version,
            bias_voltage: self.bias_voltage,
            hw_timer_mode: self.hw_timer_mode,
            interface_name: self.interface_name,
            mpx_clock_mhz: self.mpx_clock_mhz,
            mpx_type: self.mpx_type,
            pixelman_version: self.pixelman_version,
            polarity: self.polarity,
            start_time_epoch: self.start_time_epoch,
            start_time_string: self.start_time_string,
            tpx_clock_mhz: self.tpx_clock_mhz,
            name_and_serial_number: self.name_and_serial_number,
            source_file_path: self.source_file_path,
            derived_data_file_path,
        }
    }
}

/// Timepix clock: an enumerated code (`byte[1]`) or a direct MHz value
/// (`double[1]`), depending on the storage type line
fn parse_tpx_clock(field: &FieldLines<'_>) -> DscResult<f64> {
    let storage_type =
        field
            .line_at(TYPE_LINE_OFFSET)
            .ok_or_else(|| DscError::MalformedClockField {
                path: field.path(),
                reason: "storage type line missing".to_string(),
            })?;
    let raw = field.value();

    if storage_type.contains(storage_markers::BYTE) {
        raw.parse::<i64>()
            .ok()
            .and_then(tpx_clock_for_code)
            .ok_or_else(|| DscError::InvalidClockMode {
                path: field.path(),
                value: raw.to_string(),
            })
    } else if storage_type.contains(storage_markers::DOUBLE) {
        parse_float(raw).ok_or_else(|| DscError::MalformedClockField {
            path: field.path(),
            reason: format!("'{}' is not a number", raw),
        })
    } else {
        Err(DscError::MalformedClockField {
            path: field.path(),
            reason: format!("unknown storage type '{}'", storage_type),
        })
    }
}

/// The data file path: the DSC path with its last four characters removed
fn strip_dsc_suffix(dsc_path: &Path) -> PathBuf {
    let path = dsc_path.to_string_lossy();
    let keep = path.chars().count().saturating_sub(DSC_SUFFIX_LEN);
    PathBuf::from(path.chars().take(keep).collect::<String>())
}
