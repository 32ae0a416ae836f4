// SPDX-FileCopyrightText: 2026 Fieldlog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reverse geocoding against Nominatim.
//!
//! Looks up GPS fixes shared by field staff and condenses the answer to a
//! short "area, city" address. Lookups are cached by rounded coordinate,
//! spaced at least a second apart (Nominatim's usage policy), and retried
//! with backoff on rate limiting. A failed lookup is `None`; callers fall
//! back to a coordinate string.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use fieldlog_config::model::GeocodingConfig;
use fieldlog_core::{FieldlogError, GeoAccuracy, GeoFix, Geocoder};
use serde::Deserialize;
use tokio::time::Instant;
use tracing::{debug, warn};

/// Lookup attempts before giving up.
const MAX_RETRIES: u32 = 3;

/// Minimum spacing between requests.
const REQUEST_SPACING: Duration = Duration::from_secs(1);

/// Address detail returned by Nominatim. Only the fields the condenser
/// reads; everything else is ignored.
#[derive(Debug, Default, Deserialize)]
struct NominatimAddress {
    city: Option<String>,
    town: Option<String>,
    village: Option<String>,
    municipality: Option<String>,
    suburb: Option<String>,
    neighbourhood: Option<String>,
    quarter: Option<String>,
    district: Option<String>,
    subdistrict: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NominatimResponse {
    address: Option<NominatimAddress>,
}

/// Nominatim `/reverse` client with an in-memory coordinate cache.
pub struct NominatimClient {
    client: reqwest::Client,
    endpoint: String,
    /// Cache keyed by coordinates rounded to ~11 m.
    cache: Mutex<HashMap<(i64, i64), Option<GeoFix>>>,
    last_request: Mutex<Option<Instant>>,
}

impl NominatimClient {
    pub fn new(config: &GeocodingConfig) -> Result<Self, FieldlogError> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| FieldlogError::Geocode {
                message: format!("failed to build HTTP client: {e}"),
            })?;
        Ok(Self {
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            cache: Mutex::new(HashMap::new()),
            last_request: Mutex::new(None),
        })
    }

    /// Space requests out per the usage policy.
    async fn pace(&self) {
        let wait = {
            let last = self.last_request.lock().unwrap();
            last.map(|at| REQUEST_SPACING.saturating_sub(at.elapsed()))
                .unwrap_or(Duration::ZERO)
        };
        if !wait.is_zero() {
            tokio::time::sleep(wait).await;
        }
        *self.last_request.lock().unwrap() = Some(Instant::now());
    }

    async fn lookup(&self, latitude: f64, longitude: f64) -> Option<GeoFix> {
        let url = format!("{}/reverse", self.endpoint);

        for attempt in 0..MAX_RETRIES {
            self.pace().await;
            debug!(latitude, longitude, attempt, "reverse geocoding");

            let response = match self
                .client
                .get(&url)
                .query(&[
                    ("lat", latitude.to_string()),
                    ("lon", longitude.to_string()),
                    ("format", "json".to_string()),
                    ("addressdetails", "1".to_string()),
                    ("zoom", "18".to_string()),
                ])
                .send()
                .await
            {
                Ok(response) => response,
                Err(err) => {
                    warn!(%err, attempt, "geocoding request failed");
                    tokio::time::sleep(Duration::from_secs((attempt + 1) as u64)).await;
                    continue;
                }
            };

            let status = response.status();
            if status.as_u16() == 429 {
                warn!(attempt, "geocoding rate limited, backing off");
                tokio::time::sleep(Duration::from_secs(2 * (attempt + 1) as u64)).await;
                continue;
            }
            if !status.is_success() {
                warn!(%status, "geocoding API returned error status");
                return None;
            }

            let parsed: NominatimResponse = match response.json().await {
                Ok(parsed) => parsed,
                Err(err) => {
                    warn!(%err, "geocoding response was not valid JSON");
                    return None;
                }
            };
            return parsed.address.map(condense);
        }

        warn!(latitude, longitude, "all geocoding attempts failed");
        None
    }
}

#[async_trait]
impl Geocoder for NominatimClient {
    async fn reverse(&self, latitude: f64, longitude: f64) -> Option<GeoFix> {
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            warn!(latitude, longitude, "coordinates out of range");
            return None;
        }

        let key = cache_key(latitude, longitude);
        if let Some(hit) = self.cache.lock().unwrap().get(&key) {
            debug!(latitude, longitude, "geocode cache hit");
            return hit.clone();
        }

        let fix = self.lookup(latitude, longitude).await;
        self.cache.lock().unwrap().insert(key, fix.clone());
        fix
    }
}

fn cache_key(latitude: f64, longitude: f64) -> (i64, i64) {
    ((latitude * 10_000.0).round() as i64, (longitude * 10_000.0).round() as i64)
}

/// Condense a Nominatim address into a short fix.
///
/// City falls through town/village/municipality; area through
/// suburb/neighbourhood/quarter/district/subdistrict. Accuracy reflects
/// how specific the answer is.
fn condense(address: NominatimAddress) -> GeoFix {
    let city = address
        .city
        .or(address.town)
        .or(address.village)
        .or(address.municipality);
    let area = address
        .suburb
        .or(address.neighbourhood)
        .or(address.quarter)
        .or(address.district)
        .or(address.subdistrict)
        .filter(|a| !a.is_empty());

    match (area, city) {
        (Some(area), Some(city)) => GeoFix {
            short_address: format!("{area}, {city}"),
            accuracy: GeoAccuracy::High,
        },
        (None, Some(city)) => GeoFix {
            short_address: city,
            accuracy: GeoAccuracy::Medium,
        },
        (Some(area), None) => GeoFix {
            short_address: area,
            accuracy: GeoAccuracy::Medium,
        },
        (None, None) => GeoFix {
            short_address: "Unknown Location".to_string(),
            accuracy: GeoAccuracy::Low,
        },
    }
}

/// Coordinate-string fallback for when reverse lookup fails.
pub fn coordinate_fallback(latitude: f64, longitude: f64) -> String {
    format!("Location ({latitude:.4}, {longitude:.4})")
}
