//! End-to-end pipeline tests.
//!
//! These tests drive `run_enrichment` over temp files. Rows carry null
//! coordinates (which must short-circuit), coordinates pre-seeded into the
//! cache database, or coordinates served by a local mock geocoder. Unless a
//! test mounts a mock, the API base URL points at an unroutable address so an
//! unexpected network call fails fast.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use geo_enrich::{init_db_pool_with_path, run_enrichment, run_migrations, Config, GeocodeCache};

fn test_config(dir: &TempDir, files: Vec<PathBuf>) -> Config {
    Config {
        files,
        api_key: Some("prj_test_sk_abc".to_string()),
        cache_db: dir.path().join("cache.db"),
        api_base_url: "http://127.0.0.1:1".to_string(),
        throttle_ms: 0,
        ..Default::default()
    }
}

/// Parses an output CSV into one map per row, keyed by header.
fn read_output(path: &Path) -> Vec<HashMap<String, String>> {
    let mut reader = csv::Reader::from_path(path).expect("Failed to open output CSV");
    let headers: Vec<String> = reader
        .headers()
        .expect("Failed to read headers")
        .iter()
        .map(|h| h.to_string())
        .collect();
    reader
        .records()
        .map(|record| {
            let record = record.expect("Failed to read record");
            headers
                .iter()
                .cloned()
                .zip(record.iter().map(|c| c.to_string()))
                .collect()
        })
        .collect()
}

async fn seed_cache(dir: &TempDir, entries: &[(f64, f64, &str, &str)]) {
    let pool = init_db_pool_with_path(&dir.path().join("cache.db"))
        .await
        .expect("Failed to init cache pool");
    run_migrations(&pool).await.expect("Failed to migrate");
    let cache = GeocodeCache::new(pool);
    for (lat, lng, address, label) in entries {
        cache
            .store(*lat, *lng, address, label)
            .await
            .expect("Failed to seed cache");
    }
}

#[tokio::test]
async fn null_coordinates_produce_empty_fields_without_network() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("trips.csv");
    fs::write(
        &input,
        "id,start_time,end_time,duration_min,confidence,latitude,longitude,end_latitude,end_longitude\n\
         1,11:30 PM,6:00 AM,125,0.873,,,,\n",
    )
    .unwrap();

    let report = run_enrichment(test_config(&dir, vec![input]))
        .await
        .unwrap();
    assert_eq!(report.files_processed, 1);
    assert_eq!(report.files_failed, 0);
    assert_eq!(report.total_records, 1);
    assert_eq!(report.overnight_events, 1);
    // Nothing was resolved, so nothing was cached
    assert_eq!(report.cache_entries, 0);

    let rows = read_output(&dir.path().join("trips_processed.csv"));
    assert_eq!(rows.len(), 1);
    let row = &rows[0];
    assert_eq!(row["id"], "1");
    assert_eq!(row["start_address"], "");
    assert_eq!(row["start_label"], "");
    assert_eq!(row["start_google_map_link"], "");
    assert_eq!(row["end_address"], "");
    assert_eq!(row["duration_min"], "2:05");
    assert_eq!(row["confidence"], "87%");
    assert_eq!(row["overnight"], "true");
    // Columns absent from the input are filled with empty strings
    assert_eq!(row["description"], "");
    assert_eq!(row["accuracy"], "");
}

#[tokio::test]
async fn cached_coordinates_yield_addresses_and_map_links() {
    let dir = TempDir::new().unwrap();
    seed_cache(
        &dir,
        &[
            (40.7128, -74.006, "New York, NY USA", "home"),
            (40.7484, -73.9857, "350 5th Ave, New York, NY", ""),
        ],
    )
    .await;

    let input = dir.path().join("commute.csv");
    fs::write(
        &input,
        "id,start_time,end_time,start_latitude,start_longitude,end_latitude,end_longitude\n\
         1,9:00 AM,5:00 PM,40.7128,-74.006,40.7484,-73.9857\n",
    )
    .unwrap();

    let report = run_enrichment(test_config(&dir, vec![input]))
        .await
        .unwrap();
    assert_eq!(report.files_processed, 1);
    assert_eq!(report.cache_entries, 2);

    let rows = read_output(&dir.path().join("commute_processed.csv"));
    let row = &rows[0];
    assert_eq!(row["start_address"], "New York, NY USA");
    assert_eq!(row["start_label"], "home");
    assert_eq!(row["end_address"], "350 5th Ave, New York, NY");
    assert_eq!(
        row["start_google_map_link"],
        "https://www.google.com/maps?q=40.7128,-74.006"
    );
    assert_eq!(
        row["end_google_map_link"],
        "https://www.google.com/maps?q=40.7484,-73.9857"
    );
    assert_eq!(row["start_latitude"], "40.7128");
    assert_eq!(row["end_longitude"], "-73.9857");
    assert_eq!(row["overnight"], "false");
}

#[tokio::test]
async fn uncached_coordinates_are_fetched_once_and_populate_cache() {
    let dir = TempDir::new().unwrap();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/geocode/reverse"))
        .and(query_param("coordinates", "40.7128,-74.006"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "addresses": [{"formattedAddress": "New York, NY USA"}]
        })))
        // Both rows share one start pair; only the first may reach the server
        .expect(1)
        .mount(&server)
        .await;

    let input = dir.path().join("trips.csv");
    fs::write(
        &input,
        "id,start_time,end_time,latitude,longitude,end_latitude,end_longitude\n\
         1,9:00 AM,10:00 AM,40.7128,-74.006,,\n\
         2,4:00 PM,5:00 PM,40.7128,-74.006,,\n",
    )
    .unwrap();

    let config = Config {
        api_base_url: server.uri(),
        ..test_config(&dir, vec![input])
    };
    let report = run_enrichment(config).await.unwrap();
    assert_eq!(report.files_processed, 1);
    assert_eq!(report.total_records, 2);
    assert_eq!(report.cache_entries, 1);

    let rows = read_output(&dir.path().join("trips_processed.csv"));
    assert_eq!(rows[0]["start_address"], "New York, NY USA");
    assert_eq!(rows[1]["start_address"], "New York, NY USA");
    assert_eq!(
        rows[0]["start_google_map_link"],
        "https://www.google.com/maps?q=40.7128,-74.006"
    );
}

#[tokio::test]
async fn semantic_segments_json_input_resolves_combined_coordinates() {
    let dir = TempDir::new().unwrap();
    seed_cache(&dir, &[(40.7128, -74.006, "New York, NY USA", "")]).await;

    let input = dir.path().join("history.json");
    fs::write(
        &input,
        r#"{"semanticSegments": [
            {"visit": {"topCandidate": {"placeLocation": {"latLng": "40.7128°, -74.006°"}}}}
        ]}"#,
    )
    .unwrap();

    let report = run_enrichment(test_config(&dir, vec![input]))
        .await
        .unwrap();
    assert_eq!(report.files_processed, 1);

    let rows = read_output(&dir.path().join("history_processed.csv"));
    let row = &rows[0];
    assert_eq!(row["start_address"], "New York, NY USA");
    assert_eq!(row["start_latitude"], "40.7128");
    // The visit schema has no end pair
    assert_eq!(row["end_address"], "");
    assert_eq!(row["end_google_map_link"], "");
}

#[tokio::test]
async fn processed_stem_gets_geocoded_output_name() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("trips_processed.csv");
    fs::write(&input, "id,latitude,longitude\n1,,\n").unwrap();

    let report = run_enrichment(test_config(&dir, vec![input]))
        .await
        .unwrap();
    assert_eq!(
        report.outputs,
        vec![dir.path().join("trips_processed_geocoded.csv")]
    );
    assert!(dir.path().join("trips_processed_geocoded.csv").exists());
}

#[tokio::test]
async fn failing_file_is_skipped_and_remaining_files_still_process() {
    let dir = TempDir::new().unwrap();
    let bad = dir.path().join("notes.txt");
    fs::write(&bad, "not a table\n").unwrap();
    let no_coords = dir.path().join("plain.csv");
    fs::write(&no_coords, "id,name\n1,somewhere\n").unwrap();
    let good = dir.path().join("trips.csv");
    fs::write(&good, "id,latitude,longitude\n1,,\n").unwrap();

    let report = run_enrichment(test_config(&dir, vec![bad.clone(), no_coords.clone(), good]))
        .await
        .unwrap();
    assert_eq!(report.files_failed, 2);
    assert_eq!(report.files_processed, 1);
    assert_eq!(report.total_records, 1);

    // Failed files produce no output
    assert!(!dir.path().join("notes_processed.csv").exists());
    assert!(!dir.path().join("plain_processed.csv").exists());
    assert!(dir.path().join("trips_processed.csv").exists());
}

#[tokio::test]
async fn missing_api_key_fails_at_startup() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("trips.csv");
    fs::write(&input, "id,latitude,longitude\n1,,\n").unwrap();

    let config = Config {
        api_key: None,
        ..test_config(&dir, vec![input])
    };
    // The RADAR_API_KEY fallback must not be satisfied by the test
    // environment for this assertion to hold
    std::env::remove_var("RADAR_API_KEY");
    assert!(run_enrichment(config).await.is_err());
}
