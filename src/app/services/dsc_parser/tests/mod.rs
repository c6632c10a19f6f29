//! Test utilities and fixtures for DSC parser testing
//!
//! This module provides a builder for realistic DSC file content and helper
//! functions shared across the parser test modules.

use std::io::Write;
use tempfile::NamedTempFile;

use crate::constants::labels;

mod parser_tests;

/// One labelled field: marker line, storage type line, value line
#[derive(Debug, Clone)]
pub struct FixtureField {
    pub marker: String,
    pub storage_type: String,
    pub value: String,
}

/// Builder for DSC file content in the layout Pixelman writes
#[derive(Debug, Clone)]
pub struct DscFixture {
    dimensions_line: String,
    fields: Vec<FixtureField>,
}

impl Default for DscFixture {
    fn default() -> Self {
        Self::new()
    }
}

impl DscFixture {
    /// A complete, valid 256x256 Timepix frame description
    pub fn new() -> Self {
        let field = |marker: &str, storage_type: &str, value: &str| FixtureField {
            marker: marker.to_string(),
            storage_type: storage_type.to_string(),
            value: value.to_string(),
        };

        Self {
            dimensions_line: "Type=i16 [X,Y,C] width=256 height=256".to_string(),
            fields: vec![
                field(labels::ACQ_MODE, "i32[1]", "1"),
                field(labels::ACQ_TIME, "double[1]", "60.000000"),
                field(labels::CHIPBOARD_ID, "char[9]", "U12-W3456"),
                field(
                    labels::DACS,
                    "u16[14]",
                    "1 100 255 127 127 0 405 7 130 128 80 85 128 128 ",
                ),
                field(labels::FIRMWARE, "char[6]", "  fw-2.1 "),
                field(labels::BIAS_VOLTAGE, "double[1]", "50.000000"),
                field(labels::HW_TIMER, "i32[1]", "0"),
                field(labels::INTERFACE, "char[7]", "USB 1.0"),
                field(labels::MPX_CLOCK, "double[1]", "10.000000"),
                field(labels::MPX_TYPE, "i32[1]", "3"),
                field(labels::PIXELMAN_VERSION, "char[5]", "2.2.2"),
                field(labels::POLARITY, "i32[1]", "1"),
                field(labels::START_TIME, "double[1]", "1000000000.123456"),
                field(
                    "\"Start time (string)\" (\"Acquisition start time (string)\"):",
                    "char[64]",
                    "Sun Sep 09 01:46:40.123456 2001",
                ),
                field(
                    "\"Timepix clock\" (\"Timepix clock (0-3: 10MHz, 20MHz, 40MHz, 80MHz)\"):",
                    "byte[1]",
                    "2",
                ),
                field(labels::NAME_SN, "char[12]", "USB-TPX-0001"),
            ],
        }
    }

    /// Replace the whole dimensions line (line index 2)
    pub fn dimensions_line(mut self, line: &str) -> Self {
        self.dimensions_line = line.to_string();
        self
    }

    /// Set width and height on the standard dimensions line
    pub fn dimensions(self, width: i64, height: i64) -> Self {
        self.dimensions_line(&format!(
            "Type=i16 [X,Y,C] width={} height={}",
            width, height
        ))
    }

    /// Replace the value line of the field whose marker contains `marker`
    pub fn value(mut self, marker: &str, value: &str) -> Self {
        if let Some(field) = self.fields.iter_mut().find(|f| f.marker.contains(marker)) {
            field.value = value.to_string();
        }
        self
    }

    /// Replace the storage type line of the field whose marker contains `marker`
    pub fn storage_type(mut self, marker: &str, storage_type: &str) -> Self {
        if let Some(field) = self.fields.iter_mut().find(|f| f.marker.contains(marker)) {
            field.storage_type = storage_type.to_string();
        }
        self
    }

    /// Rewrite the marker line of a field (e.g. to change its casing)
    pub fn marker(mut self, marker: &str, replacement: &str) -> Self {
        if let Some(field) = self.fields.iter_mut().find(|f| f.marker.contains(marker)) {
            field.marker = replacement.to_string();
        }
        self
    }

    /// Drop a field entirely
    pub fn without(mut self, marker: &str) -> Self {
        self.fields.retain(|f| !f.marker.contains(marker));
        self
    }

    /// Append a field after all others
    pub fn push(mut self, marker: &str, storage_type: &str, value: &str) -> Self {
        self.fields.push(FixtureField {
            marker: marker.to_string(),
            storage_type: storage_type.to_string(),
            value: value.to_string(),
        });
        self
    }

    pub fn render(&self) -> String {
        let mut lines = vec![
            "A000000001".to_string(),
            "[F0]".to_string(),
            self.dimensions_line.clone(),
        ];
        for field in &self.fields {
            lines.push(field.marker.clone());
            lines.push(field.storage_type.clone());
            lines.push(field.value.clone());
        }
        let mut content = lines.join("\n");
        content.push('\n');
        content
    }
}

/// Helper to create a temporary file with given content
pub fn create_temp_file(content: &str) -> NamedTempFile {
    let mut temp_file = NamedTempFile::new().unwrap();
    write!(temp_file, "{}", content).unwrap();
    temp_file.flush().unwrap();
    temp_file
}
