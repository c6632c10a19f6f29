//! Label recognition for DSC files
//!
//! A line "carries" a label when it contains the label's marker text. Most
//! markers match case-sensitively; the bias voltage and Timepix clock markers
//! compare lowercase forms because Pixelman 2.1.1 and 2.2.2 disagree on their
//! casing.

use crate::constants::labels;

/// The labelled fields a DSC file can contain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DscLabel {
    AcqMode,
    AcqTime,
    ChipboardId,
    Dacs,
    Firmware,
    BiasVoltage,
    HwTimer,
    Interface,
    MpxClock,
    MpxType,
    PixelmanVersion,
    Polarity,
    StartTime,
    TpxClock,
    NameAndSerial,
}

impl DscLabel {
    /// All labels in the order they are tested against a line
    pub const ALL: [DscLabel; 15] = [
        DscLabel::AcqMode,
        DscLabel::AcqTime,
        DscLabel::ChipboardId,
        DscLabel::Dacs,
        DscLabel::Firmware,
        DscLabel::BiasVoltage,
        DscLabel::HwTimer,
        DscLabel::Interface,
        DscLabel::MpxClock,
        DscLabel::MpxType,
        DscLabel::PixelmanVersion,
        DscLabel::Polarity,
        DscLabel::StartTime,
        DscLabel::TpxClock,
        DscLabel::NameAndSerial,
    ];

    /// Marker text written by Pixelman
    pub fn marker(self) -> &'static str {
        match self {
            DscLabel::AcqMode => labels::ACQ_MODE,
            DscLabel::AcqTime => labels::ACQ_TIME,
            DscLabel::ChipboardId => labels::CHIPBOARD_ID,
            DscLabel::Dacs => labels::DACS,
            DscLabel::Firmware => labels::FIRMWARE,
            DscLabel::BiasVoltage => labels::BIAS_VOLTAGE,
            DscLabel::HwTimer => labels::HW_TIMER,
            DscLabel::Interface => labels::INTERFACE,
            DscLabel::MpxClock => labels::MPX_CLOCK,
            DscLabel::MpxType => labels::MPX_TYPE,
            DscLabel::PixelmanVersion => labels::PIXELMAN_VERSION,
            DscLabel::Polarity => labels::POLARITY,
            DscLabel::StartTime => labels::START_TIME,
            DscLabel::TpxClock => labels::TPX_CLOCK,
            DscLabel::NameAndSerial => labels::NAME_SN,
        }
    }

    /// Short field name used in diagnostics
    pub fn name(self) -> &'static str {
        match self {
            DscLabel::AcqMode => "Acq mode",
            DscLabel::AcqTime => "Acq time",
            DscLabel::ChipboardId => "ChipboardID",
            DscLabel::Dacs => "DACs",
            DscLabel::Firmware => "Firmware",
            DscLabel::BiasVoltage => "HV",
            DscLabel::HwTimer => "Hw timer",
            DscLabel::Interface => "Interface",
            DscLabel::MpxClock => "Mpx clock",
            DscLabel::MpxType => "Mpx type",
            DscLabel::PixelmanVersion => "Pixelman version",
            DscLabel::Polarity => "Polarity",
            DscLabel::StartTime => "Start time",
            DscLabel::TpxClock => "Timepix clock",
            DscLabel::NameAndSerial => "Name+SN",
        }
    }

    pub fn is_case_insensitive(self) -> bool {
        matches!(self, DscLabel::BiasVoltage | DscLabel::TpxClock)
    }

    /// Whether `line` carries this label
    pub fn matches(self, line: &str) -> bool {
        if self.is_case_insensitive() {
            line.to_lowercase().contains(&self.marker().to_lowercase())
        } else {
            line.contains(self.marker())
        }
    }

    /// First label carried by `line`, if any
    pub fn find(line: &str) -> Option<DscLabel> {
        Self::ALL.into_iter().find(|label| label.matches(line))
    }
}

impl std::fmt::Display for DscLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
