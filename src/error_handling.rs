//! Error types and non-fatal error statistics.

use log::SetLoggerError;
use reqwest::Error as ReqwestError;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use strum::IntoEnumIterator;
use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;
use tokio_retry::strategy::ExponentialBackoff;

/// Error types for initialization failures.
#[derive(Error, Debug)]
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing the HTTP client.
    #[error("HTTP client initialization error: {0}")]
    HttpClientError(#[from] ReqwestError),
}

/// Error types for cache database operations.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Error creating the database file.
    #[error("Database file creation error: {0}")]
    FileCreationError(String),

    /// SQL execution error.
    #[error("SQL error: {0}")]
    SqlError(#[from] sqlx::Error),
}

/// Error types for input loading and schema detection.
///
/// These are fatal for the file being processed; with multiple input files the
/// remaining files are still processed.
#[derive(Error, Debug)]
pub enum LoadError {
    /// Input file has an extension other than .csv or .json.
    #[error("Unsupported file extension {0:?}. Use .csv or .json")]
    UnsupportedExtension(String),

    /// JSON input was neither a list of objects nor an object containing a
    /// `semanticSegments` list.
    #[error("Unsupported JSON structure")]
    UnsupportedJsonStructure,

    /// No known coordinate schema matched the input columns.
    #[error("Could not find coordinate columns. Available columns: {0:?}")]
    NoCoordinateSchema(Vec<String>),

    /// I/O error reading the input file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parse error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON parse error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Types of non-fatal errors that can occur while resolving addresses.
///
/// Each variant represents a specific failure mode in the geocoding pipeline.
/// All of them are recovered locally as an empty address; the counts are
/// reported at the end of the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum ErrorType {
    /// The geocoder returned a non-success HTTP status
    GeocodeStatusError,
    /// The geocoder returned 429 Too Many Requests
    GeocodeTooManyRequests,
    /// The request timed out
    GeocodeTimeoutError,
    /// The request could not be sent
    GeocodeRequestError,
    /// The connection could not be established
    GeocodeConnectError,
    /// The response body could not be read
    GeocodeBodyError,
    /// The response body could not be decoded as JSON
    GeocodeDecodeError,
    /// Any other request failure
    GeocodeOtherError,
    /// A successful response that carried no addresses
    GeocodeEmptyResponse,
}

impl ErrorType {
    /// Human-readable name used in the statistics dump.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorType::GeocodeStatusError => "Geocode HTTP status error",
            ErrorType::GeocodeTooManyRequests => "Geocode too many requests",
            ErrorType::GeocodeTimeoutError => "Geocode request timeout",
            ErrorType::GeocodeRequestError => "Geocode request error",
            ErrorType::GeocodeConnectError => "Geocode connect error",
            ErrorType::GeocodeBodyError => "Geocode body error",
            ErrorType::GeocodeDecodeError => "Geocode response decode error",
            ErrorType::GeocodeOtherError => "Geocode other error",
            ErrorType::GeocodeEmptyResponse => "Geocode response without addresses",
        }
    }
}

/// Thread-safe error statistics tracker.
///
/// Tracks the count of each error type using atomic counters. All error types
/// are initialized to zero on creation.
pub struct ErrorStats {
    errors: HashMap<ErrorType, AtomicUsize>,
}

impl ErrorStats {
    /// Creates a tracker with every counter at zero.
    pub fn new() -> Self {
        let mut errors = HashMap::new();
        for error in ErrorType::iter() {
            errors.insert(error, AtomicUsize::new(0));
        }
        ErrorStats { errors }
    }

    /// Increments the counter for one error type.
    pub fn increment(&self, error: ErrorType) {
        // All ErrorType variants are initialized in new(), so unwrap() is safe
        self.errors
            .get(&error)
            .unwrap()
            .fetch_add(1, Ordering::Relaxed);
    }

    /// Current count for one error type.
    pub fn get_count(&self, error: ErrorType) -> usize {
        // All ErrorType variants are initialized in new(), so unwrap() is safe
        self.errors.get(&error).unwrap().load(Ordering::SeqCst)
    }

    /// Sum of all counters.
    pub fn total(&self) -> usize {
        ErrorType::iter().map(|e| self.get_count(e)).sum()
    }
}

impl Default for ErrorStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Creates an exponential backoff retry strategy.
///
/// Returns a retry strategy configured with:
/// - Initial delay: `RETRY_INITIAL_DELAY_MS` milliseconds
/// - Backoff factor: `RETRY_FACTOR` (doubles delay each retry)
/// - Maximum delay: `RETRY_MAX_DELAY_SECS` seconds
pub fn get_retry_strategy() -> ExponentialBackoff {
    ExponentialBackoff::from_millis(crate::config::RETRY_INITIAL_DELAY_MS)
        .factor(crate::config::RETRY_FACTOR)
        .max_delay(Duration::from_secs(crate::config::RETRY_MAX_DELAY_SECS))
}

/// Updates error statistics based on a `reqwest::Error`.
///
/// Analyzes the error and increments the appropriate `ErrorType` counter.
/// Handles both HTTP status errors (e.g., 429 Too Many Requests) and
/// network-level errors (timeouts, connection failures, etc.).
pub fn update_error_stats(error_stats: &ErrorStats, error: &reqwest::Error) {
    let error_type = match error.status() {
        Some(status) if status.as_u16() == 429 => ErrorType::GeocodeTooManyRequests,
        Some(_) => ErrorType::GeocodeStatusError,
        None => {
            if error.is_timeout() {
                ErrorType::GeocodeTimeoutError
            } else if error.is_request() {
                ErrorType::GeocodeRequestError
            } else if error.is_connect() {
                ErrorType::GeocodeConnectError
            } else if error.is_body() {
                ErrorType::GeocodeBodyError
            } else if error.is_decode() {
                ErrorType::GeocodeDecodeError
            } else {
                ErrorType::GeocodeOtherError
            }
        }
    };

    error_stats.increment(error_type);
}
