//! DSC parser for Pixelman detector settings files
//!
//! Every frame captured by Pixelman is accompanied by a `.dsc` text file
//! describing the acquisition: frame size, shutter time, chipboard ID, bias
//! voltage, clocks and the fourteen DAC settings. This module reads and
//! validates those files.
//!
//! ## Architecture
//!
//! - [`parser`] - File reading and the two parsing passes
//! - [`labels`] - Label markers and their matching rules
//! - [`field_parsers`] - Conversion and validation of single values
//! - [`timestamp`] - Pixelman start-time string formatting
//!
//! ## Usage
//!
//! ```no_run
//! use dsc_processor::app::services::dsc_parser::DscParser;
//!
//! # fn example() -> Result<(), dsc_processor::error::DscError> {
//! let metadata = DscParser::new().parse_file(std::path::Path::new("frame_0001.txt.dsc"))?;
//!
//! println!("{}x{} frame from {:?} taken {:?}",
//!          metadata.frame_width(),
//!          metadata.frame_height(),
//!          metadata.chipboard_id(),
//!          metadata.start_time_string());
//! # Ok(())
//! # }
//! ```

pub mod field_parsers;
pub mod labels;
pub mod parser;
pub mod timestamp;

#[cfg(test)]
pub mod tests;

pub use labels::DscLabel;
pub use parser::{DscParser, parse};
pub use timestamp::pixelman_time_string;
