//! Pixelman start-time formatting
//!
//! Pixelman writes acquisition start times as `Thu Jan 01 00:00:00.000000 1970`:
//! a C `asctime`-like layout with microseconds spliced in before the year.
//! Downstream tools compare these strings verbatim.

use crate::constants::{PIXELMAN_TIME_PREFIX_FORMAT, SUB_SECOND_DIGITS};
use chrono::{DateTime, Utc};

/// Whole seconds of the start time (truncated toward zero)
pub fn whole_seconds(epoch: f64) -> Option<i64> {
    if !epoch.is_finite() {
        return None;
    }
    let truncated = epoch.trunc();
    if truncated < i64::MIN as f64 || truncated > i64::MAX as f64 {
        return None;
    }
    Some(truncated as i64)
}

/// Sub-second digits: the start time rounded to 6 decimals, fraction only
pub fn sub_second_digits(epoch: f64) -> String {
    let formatted = format!("{:.*}", SUB_SECOND_DIGITS, epoch);
    formatted
        .split_once('.')
        .map(|(_, fraction)| fraction.to_string())
        .unwrap_or_else(|| "0".repeat(SUB_SECOND_DIGITS))
}

/// Format a start time in the Pixelman layout
///
/// Returns `None` when the whole-second part cannot be represented as a UTC
/// calendar time.
pub fn pixelman_time_string(epoch: f64) -> Option<String> {
    let seconds = whole_seconds(epoch)?;
    let time: DateTime<Utc> = DateTime::from_timestamp(seconds, 0)?;

    Some(format!(
        "{}.{} {}",
        time.format(PIXELMAN_TIME_PREFIX_FORMAT),
        sub_second_digits(epoch),
        time.format("%Y")
    ))
}
