//! Statistics printing.

use std::path::Path;

use log::info;
use strum::IntoEnumIterator;

use crate::error_handling::{ErrorStats, ErrorType};

/// Per-file processing counters.
#[derive(Debug, Default, Clone)]
pub struct FileStats {
    /// Total records processed in the file
    pub records: usize,
    /// Records that resolved to a non-empty start address
    pub start_addresses: usize,
    /// Records that resolved to a non-empty end address
    pub end_addresses: usize,
    /// Records flagged as overnight events
    pub overnight_events: usize,
}

/// Prints per-file processing statistics to the log.
pub fn print_file_statistics(input_path: &Path, stats: &FileStats) {
    info!("Processing statistics for {}:", input_path.display());
    info!("   Total records processed: {}", stats.records);
    info!(
        "   Records with start addresses: {}",
        stats.start_addresses
    );
    info!("   Records with end addresses: {}", stats.end_addresses);
    info!("   Overnight events detected: {}", stats.overnight_events);
}

/// Prints non-fatal geocoding error statistics to the log.
pub fn print_error_statistics(error_stats: &ErrorStats) {
    let total_errors = error_stats.total();
    if total_errors == 0 {
        return;
    }

    info!("Error Counts ({} total):", total_errors);
    for error_type in ErrorType::iter() {
        let count = error_stats.get_count(error_type);
        if count > 0 {
            info!("   {}: {}", error_type.as_str(), count);
        }
    }
}
