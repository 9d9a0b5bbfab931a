//! Persistent geocode cache.
//!
//! A file-backed mapping from an exact `(lat, lng)` pair to a previously
//! resolved address and label. Keys are compared on exact floating-point
//! equality: no normalization, rounding, or proximity matching, so repeated
//! requests for the "same" place with slightly different float text will miss.

use std::sync::Arc;

use log::debug;
use sqlx::{Pool, Row, Sqlite};

use crate::error_handling::DatabaseError;

/// Applies the cache schema.
///
/// Idempotent; safe to run on every startup.
pub async fn run_migrations(pool: &Pool<Sqlite>) -> Result<(), DatabaseError> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS geocode_cache (
            lat REAL NOT NULL,
            lng REAL NOT NULL,
            address TEXT NOT NULL,
            label TEXT NOT NULL DEFAULT '',
            PRIMARY KEY (lat, lng)
        )",
    )
    .execute(pool)
    .await?;
    Ok(())
}

/// A cached (address, label) pair; either side may be empty.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CachedAddress {
    /// Formatted address, empty when resolution failed or returned nothing
    pub address: String,
    /// Optional human label, empty for entries written by this tool
    pub label: String,
}

/// Handle to the persistent geocode cache.
#[derive(Clone)]
pub struct GeocodeCache {
    pool: Arc<Pool<Sqlite>>,
}

impl GeocodeCache {
    /// Wraps an initialized pool. The schema must already be applied via
    /// [`run_migrations`].
    pub fn new(pool: Arc<Pool<Sqlite>>) -> Self {
        Self { pool }
    }

    /// Looks up the cached resolution for an exact coordinate pair.
    pub async fn lookup(
        &self,
        lat: f64,
        lng: f64,
    ) -> Result<Option<CachedAddress>, DatabaseError> {
        let row = sqlx::query("SELECT address, label FROM geocode_cache WHERE lat = ? AND lng = ?")
            .bind(lat)
            .bind(lng)
            .fetch_optional(self.pool.as_ref())
            .await?;

        match row {
            Some(row) => {
                debug!("Cache hit for coordinates ({lat}, {lng})");
                Ok(Some(CachedAddress {
                    address: row.get("address"),
                    label: row.get("label"),
                }))
            }
            None => {
                debug!("Cache miss for coordinates ({lat}, {lng})");
                Ok(None)
            }
        }
    }

    /// Stores a resolution, overwriting any existing entry for that exact
    /// pair. Failed resolutions are stored as empty strings so the pair is
    /// not re-fetched.
    pub async fn store(
        &self,
        lat: f64,
        lng: f64,
        address: &str,
        label: &str,
    ) -> Result<(), DatabaseError> {
        sqlx::query(
            "INSERT OR REPLACE INTO geocode_cache (lat, lng, address, label) VALUES (?, ?, ?, ?)",
        )
        .bind(lat)
        .bind(lng)
        .bind(address)
        .bind(label)
        .execute(self.pool.as_ref())
        .await?;
        debug!("Cached address for coordinates ({lat}, {lng})");
        Ok(())
    }

    /// Number of cached entries, logged at startup.
    pub async fn entry_count(&self) -> Result<i64, DatabaseError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM geocode_cache")
            .fetch_one(self.pool.as_ref())
            .await?;
        Ok(count)
    }
}
