//! Export functionality for enriched tables.

mod csv;

pub use csv::{export_csv, OUTPUT_COLUMNS};
