//! geo_enrich library: location-history enrichment pipeline
//!
//! This library ingests location-history records (CSV or JSON), resolves
//! latitude/longitude pairs to human-readable addresses via the Radar
//! reverse-geocoding API, caches resolutions in a local SQLite store, and
//! emits an enriched CSV with derived columns (formatted duration,
//! confidence, map links, overnight-event flags).
//!
//! # Example
//!
//! ```no_run
//! use geo_enrich::{Config, run_enrichment};
//! use std::path::PathBuf;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config {
//!     files: vec![PathBuf::from("trips.csv")],
//!     api_key: Some("prj_live_sk_...".to_string()),
//!     ..Default::default()
//! };
//!
//! let report = run_enrichment(config).await?;
//! println!("Processed {} records across {} files",
//!          report.total_records, report.files_processed);
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime. Use `#[tokio::main]` in your
//! application or ensure you're calling library functions within an async
//! context.

#![warn(missing_docs)]

mod app;
pub mod config;
pub mod error_handling;
pub mod export;
pub mod fields;
mod geocode;
pub mod initialization;
pub mod load;
pub mod schema;
mod storage;

// Re-export public API
pub use config::{Config, LogFormat, LogLevel};
pub use run::{run_enrichment, EnrichmentReport};
pub use storage::{init_db_pool_with_path, run_migrations, CachedAddress, GeocodeCache};

// Internal run module (contains the main pipeline logic)
mod run {
    use std::path::{Path, PathBuf};
    use std::sync::Arc;
    use std::time::Duration;

    use anyhow::{Context, Result};
    use log::{debug, info, warn};

    use crate::app::statistics::FileStats;
    use crate::app::{log_progress, print_error_statistics, print_file_statistics};
    use crate::config::{Config, API_KEY_ENV_VAR, PROGRESS_LOG_INTERVAL};
    use crate::error_handling::{ErrorStats, LoadError};
    use crate::export::export_csv;
    use crate::fields::{
        combine_latlng, format_confidence, format_duration, google_maps_link, is_overnight,
    };
    use crate::geocode::{AddressResolver, RadarClient};
    use crate::initialization::init_client;
    use crate::load::{load_table, RecordTable};
    use crate::schema::{detect_schema, parse_coordinate, SchemaMapping};
    use crate::storage::{init_db_pool_with_path, run_migrations, GeocodeCache};

    /// Results of an enrichment run.
    ///
    /// Contains summary statistics about the completed run.
    #[derive(Debug, Clone)]
    pub struct EnrichmentReport {
        /// Number of input files successfully processed
        pub files_processed: usize,
        /// Number of input files that failed and were skipped
        pub files_failed: usize,
        /// Total records written across all output files
        pub total_records: usize,
        /// Records flagged as overnight events
        pub overnight_events: usize,
        /// Paths of the written output files
        pub outputs: Vec<PathBuf>,
        /// Entries in the geocode cache after the run
        pub cache_entries: i64,
        /// Elapsed time in seconds
        pub elapsed_seconds: f64,
    }

    /// Runs the enrichment pipeline with the provided configuration.
    ///
    /// This is the main entry point for the library. It loads each input
    /// file, resolves start/end coordinates against the cache (falling back
    /// to the remote geocoder), computes derived display fields, and writes
    /// one enriched CSV per input.
    ///
    /// # Errors
    ///
    /// Returns an error if no API key is available, or if the cache database
    /// or HTTP client cannot be initialized. Per-file failures are logged and
    /// skipped; they do not fail the run.
    pub async fn run_enrichment(config: Config) -> Result<EnrichmentReport> {
        let api_key = match &config.api_key {
            Some(key) => key.clone(),
            None => std::env::var(API_KEY_ENV_VAR).with_context(|| {
                format!("No API key: pass --api-key or set {API_KEY_ENV_VAR}")
            })?,
        };

        let start_time = std::time::Instant::now();

        let pool = init_db_pool_with_path(&config.cache_db)
            .await
            .context("Failed to initialize cache database pool")?;
        run_migrations(&pool)
            .await
            .context("Failed to apply cache schema")?;

        let cache = GeocodeCache::new(Arc::clone(&pool));
        info!("Connected to cache database: {}", config.cache_db.display());
        info!(
            "Current cache contains {} addresses",
            cache.entry_count().await?
        );

        let client = init_client(&config).context("Failed to initialize HTTP client")?;
        let error_stats = Arc::new(ErrorStats::new());
        let resolver = AddressResolver::new(
            cache.clone(),
            RadarClient::new(client, config.api_base_url.clone(), api_key),
            Duration::from_millis(config.throttle_ms),
            Arc::clone(&error_stats),
        );

        let total_files = config.files.len();
        info!(
            "Processing {} file{}...",
            total_files,
            if total_files == 1 { "" } else { "s" }
        );

        let mut files_processed = 0;
        let mut files_failed = 0;
        let mut total_records = 0;
        let mut overnight_events = 0;
        let mut outputs = Vec::new();

        for (idx, input_path) in config.files.iter().enumerate() {
            info!(
                "[{}/{}] Processing: {}",
                idx + 1,
                total_files,
                input_path.display()
            );
            match process_file(input_path, &resolver).await {
                Ok(outcome) => {
                    files_processed += 1;
                    total_records += outcome.stats.records;
                    overnight_events += outcome.stats.overnight_events;
                    outputs.push(outcome.output);
                }
                Err(e) => {
                    warn!("Error processing {}: {e:#}", input_path.display());
                    files_failed += 1;
                }
            }
        }

        print_error_statistics(&error_stats);

        let cache_entries = cache.entry_count().await?;
        let elapsed_seconds = start_time.elapsed().as_secs_f64();

        Ok(EnrichmentReport {
            files_processed,
            files_failed,
            total_records,
            overnight_events,
            outputs,
            cache_entries,
            elapsed_seconds,
        })
    }

    struct FileOutcome {
        output: PathBuf,
        stats: FileStats,
    }

    async fn process_file(input_path: &Path, resolver: &AddressResolver) -> Result<FileOutcome> {
        let output_path = output_path_for(input_path);

        info!("Loading input file: {}", input_path.display());
        let mut table = load_table(input_path)?;
        info!("Loaded {} records", table.len());

        let schema = detect_schema(table.columns())
            .ok_or_else(|| LoadError::NoCoordinateSchema(table.columns().to_vec()))?;
        info!("Detected coordinate schema: {}", schema.name);

        extract_coordinates(&mut table, schema);

        let mut stats = FileStats::default();
        enrich(&mut table, resolver, &mut stats).await?;

        info!("Writing output to: {}", output_path.display());
        let written = export_csv(&table, &output_path)?;
        info!(
            "Wrote {} records with Radar addresses to {}",
            written,
            output_path.display()
        );
        print_file_statistics(input_path, &stats);

        Ok(FileOutcome {
            output: output_path,
            stats,
        })
    }

    /// Derives the output filename by suffixing the input basename: stems that
    /// already carry `_processed` get `_geocoded.csv`, everything else
    /// `_processed.csv`.
    fn output_path_for(input_path: &Path) -> PathBuf {
        let stem = input_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let suffix = if stem.contains("_processed") {
            "_geocoded.csv"
        } else {
            "_processed.csv"
        };
        input_path.with_file_name(format!("{stem}{suffix}"))
    }

    /// Normalizes the schema's coordinate sources into the four canonical
    /// columns (`start_latitude`, `start_longitude`, `end_latitude`,
    /// `end_longitude`), empty where unknown.
    fn extract_coordinates(table: &mut RecordTable, schema: &SchemaMapping) {
        let end_source = schema
            .end
            .filter(|source| source.is_present(table.columns()));

        for i in 0..table.len() {
            let (lat, lng) = schema.start.extract(table.row(i));
            table.set_cell(i, "start_latitude", display_coordinate(lat));
            table.set_cell(i, "start_longitude", display_coordinate(lng));

            let (end_lat, end_lng) = match end_source {
                Some(source) => source.extract(table.row(i)),
                None => (None, None),
            };
            table.set_cell(i, "end_latitude", display_coordinate(end_lat));
            table.set_cell(i, "end_longitude", display_coordinate(end_lng));
        }
    }

    fn display_coordinate(value: Option<f64>) -> String {
        value.map(|v| v.to_string()).unwrap_or_default()
    }

    async fn enrich(
        table: &mut RecordTable,
        resolver: &AddressResolver,
        stats: &mut FileStats,
    ) -> Result<()> {
        let total = table.len();
        for i in 0..total {
            if i % PROGRESS_LOG_INTERVAL == 0 {
                log_progress(i + 1, total);
            }

            let lat = parse_coordinate(table.get(i, "start_latitude"));
            let lng = parse_coordinate(table.get(i, "start_longitude"));
            let start = resolver.resolve(lat, lng).await?;
            if !start.address.is_empty() {
                stats.start_addresses += 1;
            }
            table.set_cell(i, "start_latlng", combine_latlng(lat, lng));
            table.set_cell(i, "start_google_map_link", google_maps_link(lat, lng));
            table.set_cell(i, "start_address", start.address);
            table.set_cell(i, "start_label", start.label);

            let end_lat = parse_coordinate(table.get(i, "end_latitude"));
            let end_lng = parse_coordinate(table.get(i, "end_longitude"));
            let end = resolver.resolve(end_lat, end_lng).await?;
            if !end.address.is_empty() {
                stats.end_addresses += 1;
            }
            table.set_cell(i, "end_latlng", combine_latlng(end_lat, end_lng));
            table.set_cell(i, "end_google_map_link", google_maps_link(end_lat, end_lng));
            table.set_cell(i, "end_address", end.address);
            table.set_cell(i, "end_label", end.label);

            let start_time = table.get(i, "start_time").to_string();
            let end_time = table.get(i, "end_time").to_string();
            let overnight = is_overnight(&start_time, &end_time);
            if overnight {
                debug!("Detected overnight event: {start_time} to {end_time}");
                stats.overnight_events += 1;
            }
            table.set_cell(i, "overnight", overnight.to_string());

            let duration = format_duration(table.get(i, "duration_min"));
            table.set_cell(i, "duration_min", duration);
            let confidence = format_confidence(table.get(i, "confidence"));
            table.set_cell(i, "confidence", confidence);

            stats.records += 1;
        }
        Ok(())
    }

}
