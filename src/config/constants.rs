//! Configuration constants.
//!
//! This module defines all configuration constants used throughout the
//! application, including default paths, timeouts, and retry parameters.

// constants (used as defaults)
/// Default path for the SQLite geocode cache
pub const CACHE_DB_PATH: &str = "./radar_geocode_cache.db";

/// Base URL of the Radar API; override with `--api-base-url` for testing
pub const RADAR_API_BASE_URL: &str = "https://api.radar.io";

/// Environment variable consulted when `--api-key` is not provided
pub const API_KEY_ENV_VAR: &str = "RADAR_API_KEY";

/// Per-request socket timeout in seconds
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Fixed delay in milliseconds after each uncached geocode call.
/// This is a crude outbound rate limit, not a concurrency primitive.
pub const GEOCODE_THROTTLE_MS: u64 = 250;

/// Record-progress log lines are emitted every this many records
pub const PROGRESS_LOG_INTERVAL: usize = 10;

// Retry strategy
/// Initial delay in milliseconds before first retry
pub const RETRY_INITIAL_DELAY_MS: u64 = 500;
/// Factor by which retry delay is multiplied on each attempt
pub const RETRY_FACTOR: u64 = 2;
/// Maximum delay between retries in seconds
pub const RETRY_MAX_DELAY_SECS: u64 = 15;
/// Maximum number of attempts per geocode request (initial attempt included)
pub const RETRY_MAX_ATTEMPTS: usize = 3;
