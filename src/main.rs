//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `geo_enrich` library that handles:
//! - Command-line argument parsing
//! - Environment variable loading (.env file)
//! - Logger initialization
//! - User-facing output formatting
//!
//! All core functionality is implemented in the library crate.

use anyhow::{Context, Result};
use clap::Parser;
use std::process;

use geo_enrich::initialization::init_logger_with;
use geo_enrich::{run_enrichment, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file (if it exists)
    // This allows setting RADAR_API_KEY in .env without exporting it manually
    // Try loading from current directory first, then from the executable's directory
    if dotenvy::dotenv().is_err() {
        if let Ok(exe_path) = std::env::current_exe() {
            if let Some(exe_dir) = exe_path.parent() {
                let env_path = exe_dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                }
            }
        }
    }

    // Parse command-line arguments into Config
    let config = Config::parse();

    // Initialize logger based on config
    let log_level = config.log_level.clone();
    let log_format = config.log_format.clone();
    init_logger_with(log_level.into(), log_format).context("Failed to initialize logger")?;

    // Run the pipeline using the library
    match run_enrichment(config).await {
        Ok(report) => {
            println!(
                "Processed {} file{} ({} records, {} overnight event{}) in {:.1}s",
                report.files_processed,
                if report.files_processed == 1 { "" } else { "s" },
                report.total_records,
                report.overnight_events,
                if report.overnight_events == 1 { "" } else { "s" },
                report.elapsed_seconds
            );
            for output in &report.outputs {
                println!("Wrote {}", output.display());
            }
            if report.files_failed > 0 {
                eprintln!("{} file(s) failed and were skipped", report.files_failed);
                process::exit(1);
            }
            Ok(())
        }
        Err(e) => {
            eprintln!("geo_enrich error: {:#}", e);
            process::exit(1);
        }
    }
}
