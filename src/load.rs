//! Input table loading.
//!
//! Loads location-history records from CSV or JSON into a [`RecordTable`].
//! JSON inputs may be either a top-level array of objects or an object with a
//! `semanticSegments` array (Google location-history export); nested objects
//! are flattened to dotted column paths such as `activity.start.latLng`.

use std::collections::HashMap;
use std::path::Path;

use serde_json::Value;

use crate::error_handling::LoadError;

/// A loaded input table: ordered column names plus string-valued rows.
///
/// Cells are stored as text; a missing cell reads as the empty string, which
/// the rest of the pipeline treats as null.
#[derive(Debug, Clone, Default)]
pub struct RecordTable {
    columns: Vec<String>,
    rows: Vec<HashMap<String, String>>,
}

impl RecordTable {
    /// Column names in input order (computed columns appended at the end).
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// All rows as string-keyed cell maps.
    pub fn rows(&self) -> &[HashMap<String, String>] {
        &self.rows
    }

    /// One row by index.
    ///
    /// # Panics
    ///
    /// Panics if `row` is out of bounds.
    pub fn row(&self, row: usize) -> &HashMap<String, String> {
        &self.rows[row]
    }

    /// Cell text, or the empty string when the cell is absent.
    pub fn get(&self, row: usize, column: &str) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Whether the table carries the named column.
    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    /// Sets a cell, registering the column if it is new.
    ///
    /// # Panics
    ///
    /// Panics if `row` is out of bounds.
    pub fn set_cell(&mut self, row: usize, column: &str, value: String) {
        if !self.has_column(column) {
            self.columns.push(column.to_string());
        }
        self.rows[row].insert(column.to_string(), value);
    }

    fn push_row(&mut self, row: HashMap<String, String>) {
        for key in row.keys() {
            if !self.has_column(key) {
                self.columns.push(key.clone());
            }
        }
        self.rows.push(row);
    }
}

/// Loads a table from `input_path`, dispatching on the file extension
/// (case-insensitive `.csv` or `.json`).
pub fn load_table(input_path: &Path) -> Result<RecordTable, LoadError> {
    let ext = input_path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "csv" => load_csv(input_path),
        "json" => load_json(input_path),
        other => Err(LoadError::UnsupportedExtension(format!(".{other}"))),
    }
}

fn load_csv(input_path: &Path) -> Result<RecordTable, LoadError> {
    let mut reader = csv::Reader::from_path(input_path)?;
    let columns: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut table = RecordTable {
        columns,
        rows: Vec::new(),
    };
    for record in reader.records() {
        let record = record?;
        let row = table
            .columns
            .iter()
            .zip(record.iter())
            .map(|(col, cell)| (col.clone(), cell.to_string()))
            .collect();
        table.rows.push(row);
    }
    Ok(table)
}

fn load_json(input_path: &Path) -> Result<RecordTable, LoadError> {
    let text = std::fs::read_to_string(input_path)?;
    let data: Value = serde_json::from_str(&text)?;

    let objects = match &data {
        Value::Object(map) => match map.get("semanticSegments") {
            Some(Value::Array(segments)) => segments.as_slice(),
            _ => return Err(LoadError::UnsupportedJsonStructure),
        },
        Value::Array(items) => items.as_slice(),
        _ => return Err(LoadError::UnsupportedJsonStructure),
    };

    let mut table = RecordTable::default();
    for item in objects {
        if !item.is_object() {
            return Err(LoadError::UnsupportedJsonStructure);
        }
        let mut row = HashMap::new();
        flatten_value("", item, &mut row);
        table.push_row(row);
    }
    Ok(table)
}

/// Flattens a JSON object into dotted-path cells.
///
/// Scalars render as their natural text; nulls and arrays render as absent
/// cells (read back as empty strings).
fn flatten_value(prefix: &str, value: &Value, row: &mut HashMap<String, String>) {
    match value {
        Value::Object(map) => {
            for (key, nested) in map {
                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{prefix}.{key}")
                };
                flatten_value(&path, nested, row);
            }
        }
        Value::String(s) => {
            row.insert(prefix.to_string(), s.clone());
        }
        Value::Number(n) => {
            row.insert(prefix.to_string(), n.to_string());
        }
        Value::Bool(b) => {
            row.insert(prefix.to_string(), b.to_string());
        }
        Value::Null | Value::Array(_) => {}
    }
}
