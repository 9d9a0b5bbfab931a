//! Configuration types and CLI options.
//!
//! This module defines enums and structs used for command-line argument parsing
//! and configuration.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::constants::{
    CACHE_DB_PATH, GEOCODE_THROTTLE_MS, RADAR_API_BASE_URL, REQUEST_TIMEOUT_SECS,
};

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// Controls how log messages are formatted:
/// - `Plain`: Human-readable format (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Pipeline configuration.
///
/// Doubles as the CLI surface (via clap) and the library configuration; it can
/// be constructed programmatically with `Default` and struct update syntax.
///
/// # Examples
///
/// ```no_run
/// use geo_enrich::Config;
/// use std::path::PathBuf;
///
/// let config = Config {
///     files: vec![PathBuf::from("trips.csv")],
///     api_key: Some("prj_live_sk_...".to_string()),
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone, Parser)]
#[command(
    name = "geo_enrich",
    about = "Enriches location-history exports (.csv/.json) with reverse-geocoded addresses"
)]
pub struct Config {
    /// Input location-history files (.csv or .json)
    #[arg(required = true, value_name = "FILES")]
    pub files: Vec<PathBuf>,

    /// Radar API key (falls back to the RADAR_API_KEY environment variable)
    #[arg(long)]
    pub api_key: Option<String>,

    /// Path to the SQLite geocode cache
    #[arg(long, default_value = CACHE_DB_PATH)]
    pub cache_db: PathBuf,

    /// Reverse-geocoding endpoint base URL
    #[arg(long, default_value = RADAR_API_BASE_URL)]
    pub api_base_url: String,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = REQUEST_TIMEOUT_SECS)]
    pub timeout_seconds: u64,

    /// Delay in milliseconds after each uncached geocode call
    #[arg(long, default_value_t = GEOCODE_THROTTLE_MS)]
    pub throttle_ms: u64,

    /// Log level
    #[arg(long, value_enum, default_value = "info")]
    pub log_level: LogLevel,

    /// Log format
    #[arg(long, value_enum, default_value = "plain")]
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            files: Vec::new(),
            api_key: None,
            cache_db: PathBuf::from(CACHE_DB_PATH),
            api_base_url: RADAR_API_BASE_URL.to_string(),
            timeout_seconds: REQUEST_TIMEOUT_SECS,
            throttle_ms: GEOCODE_THROTTLE_MS,
            log_level: LogLevel::Info,
            log_format: LogFormat::Plain,
        }
    }
}
