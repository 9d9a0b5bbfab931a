//! Application-level helpers: progress logging and run statistics.

pub mod logging;
pub mod statistics;

pub use logging::log_progress;
pub use statistics::{print_error_statistics, print_file_statistics, FileStats};
