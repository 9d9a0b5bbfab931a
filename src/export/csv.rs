//! CSV export functionality.
//!
//! Writes the enriched table with a fixed, explicit column order. Input
//! columns outside the fixed order are dropped; fixed columns missing from
//! the input are emitted as empty strings.

use std::path::Path;

use anyhow::{Context, Result};
use csv::Writer;

use crate::load::RecordTable;

/// Fixed output column order: identifiers, timestamps, duration, overnight
/// flag, type, addresses/labels, distance, confidence, map links, raw
/// coordinates, description, accuracy.
pub const OUTPUT_COLUMNS: &[&str] = &[
    "id",
    "start_date",
    "start_day",
    "start_time",
    "end_date",
    "end_day",
    "end_time",
    "duration_min",
    "overnight",
    "type",
    "start_address",
    "start_label",
    "end_address",
    "end_label",
    "distance_miles",
    "confidence",
    "start_google_map_link",
    "end_google_map_link",
    "start_latitude",
    "start_longitude",
    "end_latitude",
    "end_longitude",
    "description",
    "accuracy",
];

/// Writes the enriched table to `output_path` in the fixed column order.
///
/// Returns the number of records written.
pub fn export_csv(table: &RecordTable, output_path: &Path) -> Result<usize> {
    let mut writer = Writer::from_path(output_path).with_context(|| {
        format!(
            "Failed to create output file: {}",
            output_path.display()
        )
    })?;

    writer.write_record(OUTPUT_COLUMNS)?;
    for row in table.rows() {
        let record: Vec<&str> = OUTPUT_COLUMNS
            .iter()
            .map(|col| row.get(*col).map(String::as_str).unwrap_or(""))
            .collect();
        writer.write_record(&record)?;
    }
    writer.flush()?;

    Ok(table.len())
}
