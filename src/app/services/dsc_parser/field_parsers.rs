//! Field parsing utilities for DSC values
//!
//! Helpers that convert a single value line into a typed value. They report
//! failure as `None` or a reason string; the parser turns that into the
//! field-specific [`DscError`](crate::error::DscError).

use crate::app::models::DacValues;
use crate::constants::{
    CHIPBOARD_ID_PATTERN, DAC_COUNT, MAX_BIAS_VOLTAGE, MAX_FRAME_DIMENSION, MIN_BIAS_VOLTAGE,
    MIN_FRAME_DIMENSION,
};
use regex::Regex;
use std::sync::OnceLock;

static CHIPBOARD_ID_REGEX: OnceLock<Regex> = OnceLock::new();

/// Parse an integer value line
pub fn parse_int(raw: &str) -> Option<i64> {
    raw.trim().parse::<i64>().ok()
}

/// Parse a floating point value line
pub fn parse_float(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok()
}

/// Parse one `key=value` dimension token and check its range
pub fn parse_dimension_token(token: Option<&str>) -> Result<u32, String> {
    let token = token.ok_or_else(|| "token missing".to_string())?;

    let (_, value) = token
        .split_once('=')
        .ok_or_else(|| format!("token '{}' has no '=' separator", token))?;

    let value: i64 = value
        .trim()
        .parse()
        .map_err(|_| format!("'{}' is not an integer", value))?;

    if value < i64::from(MIN_FRAME_DIMENSION) || value > i64::from(MAX_FRAME_DIMENSION) {
        return Err(format!(
            "{} outside {}..={}",
            value, MIN_FRAME_DIMENSION, MAX_FRAME_DIMENSION
        ));
    }

    // Range check above keeps the value within u32
    Ok(value as u32)
}

/// Parse a DAC value line: exactly 14 integers separated by single spaces
pub fn parse_dac_line(raw: &str) -> Result<DacValues, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err("DAC value line is empty".to_string());
    }

    let mut values = [0i32; DAC_COUNT];
    let mut count = 0;

    for token in trimmed.split(' ') {
        let value = token
            .parse::<i32>()
            .map_err(|_| format!("'{}' is not an integer", token))?;

        if count < DAC_COUNT {
            values[count] = value;
        }
        count += 1;
    }

    if count != DAC_COUNT {
        return Err(format!("expected {} values, found {}", DAC_COUNT, count));
    }

    Ok(DacValues::new(values))
}

/// Does the chip ID conform to the `UVV-XYYYY` format?
pub fn is_chip_id_valid(chip_id: &str) -> bool {
    CHIPBOARD_ID_REGEX
        .get_or_init(|| Regex::new(CHIPBOARD_ID_PATTERN).expect("chipboard ID pattern is valid"))
        .is_match(chip_id)
}

/// Bias voltage within the accepted supply range (NaN is rejected)
pub fn is_bias_voltage_valid(volts: f64) -> bool {
    (MIN_BIAS_VOLTAGE..=MAX_BIAS_VOLTAGE).contains(&volts)
}
