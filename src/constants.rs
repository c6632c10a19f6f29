//! Application constants for the DSC processor
//!
//! This module contains the label markers written by Pixelman into detector
//! settings files, the validation ranges applied to their values, and the
//! defaults used when scanning folders of frames.

// =============================================================================
// DSC Label Markers
// =============================================================================

/// Label markers as they appear in Pixelman DSC files
///
/// Each marker is matched as a substring of a line; the value sits two lines
/// below the marker, with the storage type (e.g. `i32[1]`) in between.
pub mod labels {
    pub const ACQ_MODE: &str = "\"Acq mode\" (\"Acquisition mode\"):";
    pub const ACQ_TIME: &str = "\"Acq time\" (\"Acquisition time [s]\"):";
    pub const CHIPBOARD_ID: &str = "\"ChipboardID\" (\"Medipix or chipboard ID\"):";
    pub const DACS: &str = "\"DACs\" (\"DACs values of all chips\"):";
    pub const FIRMWARE: &str = "\"Firmware\" (\"Firmware version\"):";
    pub const BIAS_VOLTAGE: &str = "\"HV\" (\"Bias voltage [V]\"):";
    pub const HW_TIMER: &str = "\"Hw timer\" (\"Hw timer mode\"):";
    pub const INTERFACE: &str = "\"Interface\" (\"Medipix interface\"):";
    pub const MPX_CLOCK: &str = "\"Mpx clock\" (\"Medipix clock [MHz]\"):";
    pub const MPX_TYPE: &str = "\"Mpx type\" (\"Medipix type (1-2.1, 2-MXR, 3-TPX)\"):";
    pub const PIXELMAN_VERSION: &str = "\"Pixelman version\" (\"Pixelman version\"):";
    pub const POLARITY: &str =
        "\"Polarity\" (\"Detector polarity (0 negative, 1 positive)\"):";
    pub const START_TIME: &str = "\"Start time\" (\"Acquisition start time\"):";
    /// Bare substring: the full label text differs between Pixelman releases
    pub const TPX_CLOCK: &str = "Timepix clock";
    pub const NAME_SN: &str = "\"Name+SN\" (\"Name and serial number\"):";
}

/// Storage type markers found on the line between a label and its value
pub mod storage_markers {
    /// Timepix clock stored as an enumerated code
    pub const BYTE: &str = "byte[1]";
    /// Timepix clock stored directly in MHz
    pub const DOUBLE: &str = "double[1]";
}

// =============================================================================
// Layout
// =============================================================================

/// Line index (0-based) holding the `width=` / `height=` tokens
pub const DIMENSIONS_LINE_INDEX: usize = 2;

/// Token index (0-based, space-split) of the width entry
pub const WIDTH_TOKEN_INDEX: usize = 2;

/// Token index (0-based, space-split) of the height entry
pub const HEIGHT_TOKEN_INDEX: usize = 3;

/// Distance from a label line to its value line
pub const VALUE_LINE_OFFSET: usize = 2;

/// Distance from a label line to its storage type line
pub const TYPE_LINE_OFFSET: usize = 1;

// =============================================================================
// Validation Ranges
// =============================================================================

/// Smallest accepted frame edge in pixels
pub const MIN_FRAME_DIMENSION: u32 = 256;

/// Largest accepted frame edge in pixels
pub const MAX_FRAME_DIMENSION: u32 = 1024;

/// Lowest accepted bias voltage (V)
pub const MIN_BIAS_VOLTAGE: f64 = 0.0;

/// Highest accepted bias voltage (V)
pub const MAX_BIAS_VOLTAGE: f64 = 100.0;

/// Chipboard ID format, e.g. `U12-W3456`
pub const CHIPBOARD_ID_PATTERN: &str = r"^[A-Z][0-9]{2}-[A-Z][0-9]{4}";

/// Number of DAC values written per chip
pub const DAC_COUNT: usize = 14;

/// DAC names in the order Pixelman writes them
pub const DAC_NAMES: [&str; DAC_COUNT] = [
    "IKrum",
    "Disc",
    "Preamp",
    "BuffAnalogA",
    "BuffAnalogB",
    "Hist",
    "THL",
    "THLCoarse",
    "Vcas",
    "FBK",
    "GND",
    "THS",
    "BiasLVDS",
    "RefLVDS",
];

// =============================================================================
// Clocks and Time
// =============================================================================

/// Timepix clock frequency (MHz) for each enumerated clock code
pub const TPX_CLOCK_MHZ: [f64; 4] = [10.0, 20.0, 40.0, 80.0];

/// Digits kept after the decimal point of the start time
pub const SUB_SECOND_DIGITS: usize = 6;

/// Pixelman time layout before the sub-second part (`Thu Jan 01 00:00:00.`)
pub const PIXELMAN_TIME_PREFIX_FORMAT: &str = "%a %b %d %H:%M:%S";

/// Look up the clock frequency for a Timepix clock code
pub fn tpx_clock_for_code(code: i64) -> Option<f64> {
    usize::try_from(code)
        .ok()
        .and_then(|index| TPX_CLOCK_MHZ.get(index).copied())
}

// =============================================================================
// Scanning Defaults
// =============================================================================

/// File name pattern for DSC files
pub const DEFAULT_DSC_PATTERN: &str = "*.dsc";

/// Length of the `.dsc` suffix stripped to find the frame data file
pub const DSC_SUFFIX_LEN: usize = 4;

/// Configuration directory name under the user config dir
pub const CONFIG_DIR_NAME: &str = "dsc-processor";

/// Configuration file name
pub const CONFIG_FILE_NAME: &str = "config.toml";
