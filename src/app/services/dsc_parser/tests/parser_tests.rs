//! Tests for the DSC parser passes and per-label validation

use std::path::{Path, PathBuf};

use super::{DscFixture, create_temp_file};
use crate::app::models::{MpxType, Polarity};
use crate::app::services::dsc_parser::parser::{DscParser, parse};
use crate::constants::labels;
use crate::error::DscError;

const FIXTURE_PATH: &str = "frames/frame_0001.txt.dsc";

fn parse_fixture(fixture: &DscFixture) -> Result<crate::app::models::ParsedMetadata, DscError> {
    DscParser::new().parse_str(&fixture.render(), Path::new(FIXTURE_PATH))
}

fn error_kind(fixture: &DscFixture) -> &'static str {
    parse_fixture(fixture).unwrap_err().kind()
}

// =============================================================================
// Complete files
// =============================================================================

#[test]
fn test_parse_complete_file() {
    let metadata = parse_fixture(&DscFixture::new()).unwrap();

    assert_eq!(metadata.frame_width(), 256);
    assert_eq!(metadata.frame_height(), 256);
    assert_eq!(metadata.acquisition_mode(), Some(1));
    assert_eq!(metadata.acquisition_time_seconds(), Some(60.0));
    assert_eq!(metadata.chipboard_id(), Some("U12-W3456"));
    assert_eq!(metadata.firmware_version(), Some("fw-2.1"));
    assert_eq!(metadata.bias_voltage(), Some(50.0));
    assert_eq!(metadata.hw_timer_mode(), Some(0));
    assert_eq!(metadata.interface_name(), Some("USB 1.0"));
    assert_eq!(metadata.mpx_clock_mhz(), Some(10.0));
    assert_eq!(metadata.mpx_type(), Some(MpxType::Timepix));
    assert_eq!(metadata.pixelman_version(), Some("2.2.2"));
    assert_eq!(metadata.polarity(), Some(Polarity::Positive));
    assert_eq!(metadata.start_time_epoch(), Some(1000000000.123456));
    assert_eq!(
        metadata.start_time_string(),
        Some("Sun Sep 09 01:46:40.123456 2001")
    );
    assert_eq!(metadata.tpx_clock_mhz(), Some(40.0));
    assert_eq!(metadata.name_and_serial_number(), Some("USB-TPX-0001"));
    assert_eq!(metadata.source_file_path(), Path::new(FIXTURE_PATH));
    assert_eq!(
        metadata.derived_data_file_path(),
        Path::new("frames/frame_0001.txt")
    );
}

#[test]
fn test_end_to_end_minimal_scenario() {
    let fixture = DscFixture::new()
        .dimensions(256, 256)
        .value(labels::CHIPBOARD_ID, "U12-W3456")
        .value(labels::BIAS_VOLTAGE, "50.0")
        .value(labels::DACS, "0 0 0 0 0 0 0 0 0 0 0 0 0 0")
        .value(labels::START_TIME, "0.0");

    let metadata = parse_fixture(&fixture).unwrap();

    assert_eq!(metadata.frame_width(), 256);
    assert_eq!(metadata.frame_height(), 256);
    assert_eq!(metadata.bias_voltage(), Some(50.0));
    for alias in [
        metadata.ikrum(),
        metadata.disc(),
        metadata.preamp(),
        metadata.buff_analog_a(),
        metadata.buff_analog_b(),
        metadata.hist(),
        metadata.thl(),
        metadata.thl_coarse(),
        metadata.vcas(),
        metadata.fbk(),
        metadata.gnd(),
        metadata.ths(),
        metadata.bias_lvds(),
        metadata.ref_lvds(),
    ] {
        assert_eq!(alias, Some(0));
    }
    assert!(
        metadata
            .start_time_string()
            .unwrap()
            .starts_with("Thu Jan 01 00:00:00.000000 1970")
    );
}

#[test]
fn test_parse_is_idempotent() {
    let temp_file = create_temp_file(&DscFixture::new().render());

    let first = parse(temp_file.path()).unwrap();
    let second = parse(temp_file.path()).unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_parse_file_reads_from_disk() {
    let temp_file = create_temp_file(&DscFixture::new().dimensions(512, 1024).render());

    let metadata = DscParser::new().parse_file(temp_file.path()).unwrap();

    assert_eq!(metadata.frame_width(), 512);
    assert_eq!(metadata.frame_height(), 1024);
    assert_eq!(metadata.source_file_path(), temp_file.path());
}

#[test]
fn test_unreadable_file() {
    let missing = PathBuf::from("/nonexistent/dir/frame.txt.dsc");
    let err = parse(&missing).unwrap_err();

    assert_eq!(err.kind(), "FileUnreadable");
    assert_eq!(err.path(), missing.as_path());
}

#[test]
fn test_windows_line_endings() {
    let content = DscFixture::new().render().replace('\n', "\r\n");
    let metadata = DscParser::new()
        .parse_str(&content, Path::new(FIXTURE_PATH))
        .unwrap();

    assert_eq!(metadata.frame_height(), 256);
    assert_eq!(metadata.chipboard_id(), Some("U12-W3456"));
}

// =============================================================================
// Dimensions
// =============================================================================

#[test]
fn test_valid_dimensions_round_trip() {
    for (width, height) in [(256, 256), (256, 1024), (1024, 256), (512, 300), (1024, 1024)] {
        let metadata = parse_fixture(&DscFixture::new().dimensions(width, height)).unwrap();
        assert_eq!(i64::from(metadata.frame_width()), width);
        assert_eq!(i64::from(metadata.frame_height()), height);
    }
}

#[test]
fn test_out_of_range_dimensions() {
    for bad in [0, 255, 1025, 2048, -256] {
        assert_eq!(
            error_kind(&DscFixture::new().dimensions(bad, 256)),
            "MalformedDimensions"
        );
        assert_eq!(
            error_kind(&DscFixture::new().dimensions(256, bad)),
            "MalformedDimensions"
        );
    }
}

#[test]
fn test_malformed_dimensions_line() {
    let cases = [
        "Type=i16 [X,Y,C] width=abc height=256",
        "Type=i16 [X,Y,C] width=256",
        "Type=i16 [X,Y,C] width256 height=256",
        "",
    ];
    for line in cases {
        assert_eq!(
            error_kind(&DscFixture::new().dimensions_line(line)),
            "MalformedDimensions",
            "line: {:?}",
            line
        );
    }
}

#[test]
fn test_dimension_error_names_height() {
    let err = parse_fixture(&DscFixture::new().dimensions(256, 4096)).unwrap_err();
    match err {
        DscError::MalformedDimensions { dimension, .. } => assert_eq!(dimension, "height"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_file_too_short_for_dimensions() {
    let err = DscParser::new()
        .parse_str("A000000001\n[F0]\n", Path::new(FIXTURE_PATH))
        .unwrap_err();
    assert_eq!(err.kind(), "MalformedDimensions");
}

// =============================================================================
// Chipboard ID and bias voltage
// =============================================================================

#[test]
fn test_valid_chip_ids() {
    for chip_id in ["U12-W3456", "C08-W0255", "A00-Z0000"] {
        let metadata = parse_fixture(&DscFixture::new().value(labels::CHIPBOARD_ID, chip_id))
            .unwrap();
        assert_eq!(metadata.chipboard_id(), Some(chip_id));
    }
}

#[test]
fn test_invalid_chip_ids() {
    for chip_id in ["u12-w3456", "U1-W345", "1234567", "", "U12W3456"] {
        assert_eq!(
            error_kind(&DscFixture::new().value(labels::CHIPBOARD_ID, chip_id)),
            "InvalidChipId",
            "chip id: {:?}",
            chip_id
        );
    }
}

#[test]
fn test_bias_voltage_range() {
    for volts in ["0.0", "0", "12.5", "99.999", "100.0"] {
        let metadata =
            parse_fixture(&DscFixture::new().value(labels::BIAS_VOLTAGE, volts)).unwrap();
        assert_eq!(metadata.bias_voltage(), Some(volts.parse::<f64>().unwrap()));
    }

    for volts in ["-0.1", "100.01", "250", "NaN", "high"] {
        assert_eq!(
            error_kind(&DscFixture::new().value(labels::BIAS_VOLTAGE, volts)),
            "InvalidBiasVoltage",
            "volts: {:?}",
            volts
        );
    }
}

#[test]
fn test_bias_voltage_label_is_case_insensitive() {
    let fixture = DscFixture::new()
        .marker(labels::BIAS_VOLTAGE, "\"HV\" (\"Bias Voltage [V]\"):")
        .value("Bias Voltage", "42.0");

    let metadata = parse_fixture(&fixture).unwrap();
    assert_eq!(metadata.bias_voltage(), Some(42.0));
}

#[test]
fn test_other_labels_are_case_sensitive() {
    let fixture = DscFixture::new().marker(labels::ACQ_MODE, "\"acq mode\" (\"acquisition mode\"):");

    let metadata = parse_fixture(&fixture).unwrap();
    assert_eq!(metadata.acquisition_mode(), None);
}

// =============================================================================
// Integer and float fields
// =============================================================================

#[test]
fn test_field_specific_errors() {
    let cases = [
        (labels::ACQ_MODE, "one", "InvalidAcquisitionMode"),
        (labels::ACQ_TIME, "1s", "InvalidAcquisitionTime"),
        (labels::HW_TIMER, "2.5", "InvalidHwTimerMode"),
        (labels::MPX_CLOCK, "fast", "InvalidMedipixClock"),
        (labels::MPX_TYPE, "4", "InvalidMedipixType"),
        (labels::MPX_TYPE, "0", "InvalidMedipixType"),
        (labels::MPX_TYPE, "TPX", "InvalidMedipixType"),
        (labels::POLARITY, "2", "InvalidPolarity"),
        (labels::POLARITY, "-1", "InvalidPolarity"),
        (labels::START_TIME, "yesterday", "InvalidStartTime"),
    ];

    for (marker, value, expected) in cases {
        assert_eq!(
            error_kind(&DscFixture::new().value(marker, value)),
            expected,
            "{} = {:?}",
            marker,
            value
        );
    }
}

#[test]
fn test_mpx_type_and_polarity_values() {
    for (code, expected) in [("1", MpxType::Medipix21), ("2", MpxType::Mxr)] {
        let metadata = parse_fixture(&DscFixture::new().value(labels::MPX_TYPE, code)).unwrap();
        assert_eq!(metadata.mpx_type(), Some(expected));
    }

    let metadata = parse_fixture(&DscFixture::new().value(labels::POLARITY, "0")).unwrap();
    assert_eq!(metadata.polarity(), Some(Polarity::Negative));
}

#[test]
fn test_value_line_missing_at_end_of_file() {
    let content = format!(
        "{}{}\ni32[1]\n",
        DscFixture::new().without(labels::ACQ_MODE).render(),
        labels::ACQ_MODE
    );
    let err = DscParser::new()
        .parse_str(&content, Path::new(FIXTURE_PATH))
        .unwrap_err();
    assert_eq!(err.kind(), "InvalidAcquisitionMode");
}

#[test]
fn test_free_text_value_line_missing() {
    let content = format!(
        "{}{}\n",
        DscFixture::new().without(labels::FIRMWARE).render(),
        labels::FIRMWARE
    );
    let err = DscParser::new()
        .parse_str(&content, Path::new(FIXTURE_PATH))
        .unwrap_err();
    assert_eq!(err.kind(), "MissingValueLine");
}

// =============================================================================
// DAC block
// =============================================================================

#[test]
fn test_dac_aliases_follow_documented_order() {
    let fixture = DscFixture::new().value(labels::DACS, "10 11 12 13 14 15 16 17 18 19 20 21 22 23");
    let metadata = parse_fixture(&fixture).unwrap();

    assert_eq!(metadata.ikrum(), Some(10));
    assert_eq!(metadata.disc(), Some(11));
    assert_eq!(metadata.preamp(), Some(12));
    assert_eq!(metadata.buff_analog_a(), Some(13));
    assert_eq!(metadata.buff_analog_b(), Some(14));
    assert_eq!(metadata.hist(), Some(15));
    assert_eq!(metadata.thl(), Some(16));
    assert_eq!(metadata.thl_coarse(), Some(17));
    assert_eq!(metadata.vcas(), Some(18));
    assert_eq!(metadata.fbk(), Some(19));
    assert_eq!(metadata.gnd(), Some(20));
    assert_eq!(metadata.ths(), Some(21));
    assert_eq!(metadata.bias_lvds(), Some(22));
    assert_eq!(metadata.ref_lvds(), Some(23));
    assert_eq!(
        metadata.dac_values().unwrap().as_slice(),
        &[10, 11, 12, 13, 14, 15, 16, 17, 18, 19, 20, 21, 22, 23]
    );
}

#[test]
fn test_malformed_dac_blocks() {
    for line in [
        "1 2 3 4 5 6 7 8 9 10 11 12 13",
        "1 2 3 4 5 6 7 8 9 10 11 12 13 14 15",
        "1 2 3 4 5 6 7 8 9 10 11 12 13 x",
        "1  2 3 4 5 6 7 8 9 10 11 12 13 14",
        "",
    ] {
        assert_eq!(
            error_kind(&DscFixture::new().value(labels::DACS, line)),
            "MalformedDacBlock",
            "line: {:?}",
            line
        );
    }
}

#[test]
fn test_missing_dac_block_leaves_aliases_unset() {
    let metadata = parse_fixture(&DscFixture::new().without(labels::DACS)).unwrap();

    assert!(metadata.dac_values().is_none());
    assert_eq!(metadata.bias_lvds(), None);
    assert_eq!(metadata.thl(), None);
}

// =============================================================================
// Timepix clock
// =============================================================================

#[test]
fn test_tpx_clock_codes() {
    for (code, mhz) in [("0", 10.0), ("1", 20.0), ("2", 40.0), ("3", 80.0)] {
        let metadata = parse_fixture(&DscFixture::new().value("Timepix clock", code)).unwrap();
        assert_eq!(metadata.tpx_clock_mhz(), Some(mhz));
    }
}

#[test]
fn test_tpx_clock_direct_value() {
    let fixture = DscFixture::new()
        .storage_type("Timepix clock", "double[1]")
        .value("Timepix clock", "55.5");

    let metadata = parse_fixture(&fixture).unwrap();
    assert_eq!(metadata.tpx_clock_mhz(), Some(55.5));
}

#[test]
fn test_tpx_clock_invalid_code() {
    for code in ["4", "-1", "two"] {
        assert_eq!(
            error_kind(&DscFixture::new().value("Timepix clock", code)),
            "InvalidClockMode"
        );
    }
}

#[test]
fn test_tpx_clock_unknown_storage_type() {
    let fixture = DscFixture::new().storage_type("Timepix clock", "i32[1]");
    assert_eq!(error_kind(&fixture), "MalformedClockField");

    let fixture = DscFixture::new()
        .storage_type("Timepix clock", "double[1]")
        .value("Timepix clock", "fast");
    assert_eq!(error_kind(&fixture), "MalformedClockField");
}

#[test]
fn test_tpx_clock_label_on_last_line() {
    let content = format!(
        "{}\"Timepix clock\" (\"Timepix clock (0-3: 10MHz, 20MHz, 40MHz, 80MHz)\"):\n",
        DscFixture::new().without("Timepix clock").render()
    );

    let err = DscParser::new()
        .parse_str(&content, Path::new(FIXTURE_PATH))
        .unwrap_err();
    assert!(matches!(err, DscError::MalformedClockField { .. }));
}

#[test]
fn test_tpx_clock_label_is_case_insensitive() {
    let fixture = DscFixture::new()
        .marker("Timepix clock", "\"TIMEPIX CLOCK\" (\"0-3\"):")
        .value("TIMEPIX CLOCK", "3");

    let metadata = parse_fixture(&fixture).unwrap();
    assert_eq!(metadata.tpx_clock_mhz(), Some(80.0));
}

#[test]
fn test_missing_tpx_clock_is_not_an_error() {
    let metadata = parse_fixture(&DscFixture::new().without("Timepix clock")).unwrap();
    assert_eq!(metadata.tpx_clock_mhz(), None);
}

// =============================================================================
// Optional fields
// =============================================================================

#[test]
fn test_absent_labels_leave_fields_unset() {
    let fixture = DscFixture::new()
        .without(labels::ACQ_MODE)
        .without(labels::FIRMWARE)
        .without(labels::INTERFACE)
        .without(labels::NAME_SN)
        .without(labels::START_TIME);

    let metadata = parse_fixture(&fixture).unwrap();

    assert_eq!(metadata.acquisition_mode(), None);
    assert_eq!(metadata.firmware_version(), None);
    assert_eq!(metadata.interface_name(), None);
    assert_eq!(metadata.name_and_serial_number(), None);
    assert_eq!(metadata.start_time_epoch(), None);
    assert_eq!(metadata.start_time_string(), None);
}

#[test]
fn test_start_time_string_label_is_not_start_time() {
    // Only the "(string)" variant present: the numeric start time stays unset
    let metadata = parse_fixture(&DscFixture::new().without(labels::START_TIME)).unwrap();
    assert_eq!(metadata.start_time_epoch(), None);
}

#[test]
fn test_later_label_overrides_earlier() {
    let fixture = DscFixture::new().push(labels::ACQ_TIME, "double[1]", "0.5");
    let metadata = parse_fixture(&fixture).unwrap();
    assert_eq!(metadata.acquisition_time_seconds(), Some(0.5));
}

#[test]
fn test_short_path_derives_empty_data_path() {
    let metadata = DscParser::new()
        .parse_str(&DscFixture::new().render(), Path::new("a.b"))
        .unwrap();
    assert_eq!(metadata.derived_data_file_path(), Path::new(""));
}

#[test]
fn test_wide_integer_fields() {
    let fixture = DscFixture::new()
        .value(labels::ACQ_MODE, "3000000000")
        .value(labels::HW_TIMER, "-3000000000");

    let metadata = parse_fixture(&fixture).unwrap();
    assert_eq!(metadata.acquisition_mode(), Some(3_000_000_000));
    assert_eq!(metadata.hw_timer_mode(), Some(-3_000_000_000));

    // Enumerated codes still reject values outside their set
    assert_eq!(
        error_kind(&DscFixture::new().value(labels::MPX_TYPE, "4294967297")),
        "InvalidMedipixType"
    );
    assert_eq!(
        error_kind(&DscFixture::new().value(labels::POLARITY, "4294967297")),
        "InvalidPolarity"
    );
}
