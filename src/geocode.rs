//! Radar reverse-geocoding client and the cache-first address resolver.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use log::{debug, warn};
use serde::Deserialize;
use tokio_retry::Retry;

use crate::config::RETRY_MAX_ATTEMPTS;
use crate::error_handling::{
    get_retry_strategy, update_error_stats, DatabaseError, ErrorStats, ErrorType,
};
use crate::storage::{CachedAddress, GeocodeCache};

/// Radar reverse-geocode response body.
#[derive(Debug, Deserialize)]
struct ReverseGeocodeResponse {
    #[serde(default)]
    addresses: Vec<RadarAddress>,
}

#[derive(Debug, Deserialize)]
struct RadarAddress {
    #[serde(rename = "formattedAddress")]
    formatted_address: Option<String>,
}

fn first_formatted_address(body: ReverseGeocodeResponse) -> String {
    body.addresses
        .into_iter()
        .next()
        .and_then(|address| address.formatted_address)
        .unwrap_or_default()
}

/// HTTP client for Radar's reverse-geocoding endpoint.
pub struct RadarClient {
    client: Arc<reqwest::Client>,
    base_url: String,
    api_key: String,
}

impl RadarClient {
    pub fn new(
        client: Arc<reqwest::Client>,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    /// Resolves a coordinate pair to the first formatted address Radar
    /// returns, or an empty string when the response carries no addresses.
    ///
    /// Transient request failures are retried with exponential backoff before
    /// the error is surfaced to the caller.
    pub async fn reverse_geocode(&self, lat: f64, lng: f64) -> Result<String> {
        let url = format!(
            "{}/v1/geocode/reverse?coordinates={lat},{lng}",
            self.base_url
        );

        let retry_strategy = get_retry_strategy().take(RETRY_MAX_ATTEMPTS - 1);
        let response = Retry::spawn(retry_strategy, || async {
            self.client
                .get(&url)
                .header(reqwest::header::AUTHORIZATION, &self.api_key)
                .send()
                .await?
                .error_for_status()
        })
        .await
        .context("Reverse-geocode request failed")?;

        let body: ReverseGeocodeResponse = response
            .json()
            .await
            .context("Failed to decode reverse-geocode response")?;
        Ok(first_formatted_address(body))
    }
}

/// Cache-first coordinate resolver with a fixed post-request throttle.
///
/// Unknown locations and failed lookups degrade to empty strings; a single
/// resolution failure never aborts the pipeline.
pub struct AddressResolver {
    cache: GeocodeCache,
    client: RadarClient,
    throttle: Duration,
    error_stats: Arc<ErrorStats>,
}

impl AddressResolver {
    pub fn new(
        cache: GeocodeCache,
        client: RadarClient,
        throttle: Duration,
        error_stats: Arc<ErrorStats>,
    ) -> Self {
        Self {
            cache,
            client,
            throttle,
            error_stats,
        }
    }

    /// Resolves one coordinate pair to an address/label pair.
    ///
    /// `None` coordinates return empty strings without touching the network
    /// or the cache. A cache miss costs exactly one remote call; the result,
    /// successful or empty-on-failure, is stored so the pair is never fetched
    /// again, and the throttle sleep runs before the next uncached call.
    pub async fn resolve(
        &self,
        lat: Option<f64>,
        lng: Option<f64>,
    ) -> Result<CachedAddress, DatabaseError> {
        let (Some(lat), Some(lng)) = (lat, lng) else {
            return Ok(CachedAddress::default());
        };

        if let Some(cached) = self.cache.lookup(lat, lng).await? {
            return Ok(cached);
        }

        debug!("Fetching address for coordinates {lat},{lng}");
        let address = match self.client.reverse_geocode(lat, lng).await {
            Ok(address) => {
                if address.is_empty() {
                    self.error_stats.increment(ErrorType::GeocodeEmptyResponse);
                }
                address
            }
            Err(e) => {
                warn!("Reverse geocoding failed for ({lat}, {lng}): {e:#}");
                self.record_failure(&e);
                String::new()
            }
        };

        self.cache.store(lat, lng, &address, "").await?;
        tokio::time::sleep(self.throttle).await;

        Ok(CachedAddress {
            address,
            label: String::new(),
        })
    }

    fn record_failure(&self, error: &anyhow::Error) {
        match error
            .chain()
            .find_map(|cause| cause.downcast_ref::<reqwest::Error>())
        {
            Some(reqwest_err) => update_error_stats(&self.error_stats, reqwest_err),
            None => self.error_stats.increment(ErrorType::GeocodeOtherError),
        }
    }
}
