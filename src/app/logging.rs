//! Progress logging utilities.

use log::info;

/// Logs progress information about record processing.
///
/// # Arguments
///
/// * `processed` - Number of the record currently being processed (1-based)
/// * `total` - Total number of records in the file
pub fn log_progress(processed: usize, total: usize) {
    if total == 0 {
        return;
    }
    let pct = processed as f64 / total as f64 * 100.0;
    info!("Processing record {} of {} ({:.1}%)", processed, total, pct);
}
