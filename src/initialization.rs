//! Logger and HTTP client construction.

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use env_logger::Builder;
use log::LevelFilter;
use reqwest::ClientBuilder;

use crate::config::{Config, LogFormat};
use crate::error_handling::InitializationError;

/// Initializes the global logger with the given level and output format.
///
/// `Plain` uses env_logger's default human-readable format; `Json` emits one
/// JSON object per log line for machine parsing.
pub fn init_logger_with(level: LevelFilter, format: LogFormat) -> Result<(), InitializationError> {
    let mut builder = Builder::new();
    builder.filter_level(level);

    if let LogFormat::Json = format {
        builder.format(|buf, record| {
            let line = serde_json::json!({
                "ts": chrono::Utc::now().to_rfc3339(),
                "level": record.level().to_string(),
                "target": record.target(),
                "message": record.args().to_string(),
            });
            writeln!(buf, "{line}")
        });
    }

    builder.try_init()?;
    Ok(())
}

/// Builds the shared HTTP client with the configured per-request timeout.
pub fn init_client(config: &Config) -> Result<Arc<reqwest::Client>, InitializationError> {
    let client = ClientBuilder::new()
        .timeout(Duration::from_secs(config.timeout_seconds))
        .build()?;
    Ok(Arc::new(client))
}
