//! Free-text location resolution.
//!
//! Provides the [`Geocoder`] trait with Nominatim and Google implementations,
//! and the [`GeocoderAdapter`] that normalizes input, enforces the timeout and
//! turns every outcome into a [`GeocodeResult`]. The provider is created via
//! [`create_geocoder`] from configuration.

pub mod google;
pub mod nominatim;

use serde::Serialize;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::config::GeocoderConfig;
use crate::facility::types::Coordinates;

/// A resolved location.
#[derive(Debug, Clone, PartialEq)]
pub struct Place {
    pub latitude: f64,
    pub longitude: f64,
    pub address: String,
}

/// Why a lookup produced no coordinates.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeocodeFailure {
    #[error("no match found for '{0}'")]
    NotFound(String),
    #[error("geocoding service did not answer within {0}s")]
    ServiceTimeout(u64),
    #[error("geocoding service error: {0}")]
    ServiceError(String),
}

/// Machine-readable failure category carried by [`GeocodeResult`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FailureReason {
    NotFound,
    ServiceTimeout,
    ServiceError,
}

impl GeocodeFailure {
    pub fn reason(&self) -> FailureReason {
        match self {
            Self::NotFound(_) => FailureReason::NotFound,
            Self::ServiceTimeout(_) => FailureReason::ServiceTimeout,
            Self::ServiceError(_) => FailureReason::ServiceError,
        }
    }
}

/// Outcome of one geocode call. Failures are data, not errors.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeocodeResult {
    pub input: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub address: Option<String>,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<FailureReason>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl GeocodeResult {
    pub fn found(input: impl Into<String>, place: Place) -> Self {
        Self {
            input: input.into(),
            latitude: Some(place.latitude),
            longitude: Some(place.longitude),
            address: Some(place.address),
            success: true,
            reason: None,
            error: None,
        }
    }

    pub fn failed(input: impl Into<String>, failure: &GeocodeFailure) -> Self {
        Self {
            input: input.into(),
            latitude: None,
            longitude: None,
            address: None,
            success: false,
            reason: Some(failure.reason()),
            error: Some(failure.to_string()),
        }
    }

    /// Coordinates when the lookup succeeded.
    pub fn coordinates(&self) -> Option<Coordinates> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => Coordinates::new(lat, lon).ok(),
            _ => None,
        }
    }
}

pub type GeocodeFuture<'a> =
    Pin<Box<dyn Future<Output = Result<Place, GeocodeFailure>> + Send + 'a>>;

/// An external geocoding provider.
///
/// Implementations make exactly one request per call and never retry.
pub trait Geocoder: Send + Sync {
    /// Short provider name for logs.
    fn name(&self) -> &'static str;

    /// Resolve an already-normalized query.
    fn lookup<'a>(&'a self, query: &'a str) -> GeocodeFuture<'a>;
}

/// Create a geocoding provider from config.
///
/// Supported: `"nominatim"` (default) and `"google"` (requires `api_key`).
pub fn create_geocoder(config: &GeocoderConfig) -> anyhow::Result<Arc<dyn Geocoder>> {
    match config.provider.as_str() {
        "nominatim" => Ok(Arc::new(nominatim::NominatimGeocoder::new(config)?)),
        "google" => Ok(Arc::new(google::GoogleGeocoder::new(config)?)),
        other => anyhow::bail!("unknown geocoder provider: {other}. Supported: nominatim, google"),
    }
}

/// Shared reqwest client with the provider timeout and User-Agent applied.
fn http_client(config: &GeocoderConfig) -> anyhow::Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .timeout(config.timeout())
        .user_agent(config.user_agent.clone())
        .build()?;
    Ok(client)
}

/// Map a transport error onto the failure taxonomy.
///
/// The request URL is stripped: provider URLs can carry an API key, and the
/// message reaches both the logs and the agent.
fn transport_failure(err: reqwest::Error, timeout: Duration) -> GeocodeFailure {
    if err.is_timeout() {
        GeocodeFailure::ServiceTimeout(timeout.as_secs())
    } else {
        GeocodeFailure::ServiceError(err.without_url().to_string())
    }
}

/// Send a GET and return the body of a successful response.
async fn fetch_body(
    client: &reqwest::Client,
    url: reqwest::Url,
    timeout: Duration,
) -> Result<String, GeocodeFailure> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| transport_failure(e, timeout))?;

    let status = response.status();
    if !status.is_success() {
        return Err(GeocodeFailure::ServiceError(format!("HTTP {status}")));
    }

    response
        .text()
        .await
        .map_err(|e| transport_failure(e, timeout))
}

/// Input normalization, timeout enforcement and result shaping around a
/// [`Geocoder`].
#[derive(Clone)]
pub struct GeocoderAdapter {
    provider: Arc<dyn Geocoder>,
    default_country: String,
    country_hints: Vec<String>,
    timeout: Duration,
}

impl GeocoderAdapter {
    pub fn new(provider: Arc<dyn Geocoder>, config: &GeocoderConfig) -> Self {
        Self {
            provider,
            default_country: config.default_country.trim().to_string(),
            country_hints: config
                .country_hints
                .iter()
                .map(|h| h.trim().to_lowercase())
                .filter(|h| !h.is_empty())
                .collect(),
            timeout: config.timeout(),
        }
    }

    /// Trim, and append the default country when no hint is present.
    /// `None` for blank input.
    pub fn normalize(&self, input: &str) -> Option<String> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return None;
        }
        let lowered = trimmed.to_lowercase();
        let hinted = self.country_hints.iter().any(|h| lowered.contains(h.as_str()));
        if hinted || self.default_country.is_empty() {
            Some(trimmed.to_string())
        } else {
            Some(format!("{trimmed}, {}", self.default_country))
        }
    }

    /// Resolve a free-text location. Never fails; see [`GeocodeResult`].
    pub async fn geocode(&self, input: &str) -> GeocodeResult {
        let Some(query) = self.normalize(input) else {
            tracing::debug!("empty location, skipping provider");
            return GeocodeResult::failed(input, &GeocodeFailure::NotFound(input.to_string()));
        };

        let outcome = match tokio::time::timeout(self.timeout, self.provider.lookup(&query)).await {
            Ok(result) => result.and_then(check_place),
            Err(_) => Err(GeocodeFailure::ServiceTimeout(self.timeout.as_secs())),
        };

        match outcome {
            Ok(place) => {
                tracing::info!(
                    provider = self.provider.name(),
                    query = %query,
                    latitude = place.latitude,
                    longitude = place.longitude,
                    "geocode resolved"
                );
                GeocodeResult::found(input, place)
            }
            Err(failure) => {
                tracing::warn!(
                    provider = self.provider.name(),
                    query = %query,
                    reason = ?failure.reason(),
                    error = %failure,
                    "geocode failed"
                );
                GeocodeResult::failed(input, &failure)
            }
        }
    }
}

/// Providers occasionally return garbage; never pass it on as coordinates.
fn check_place(place: Place) -> Result<Place, GeocodeFailure> {
    Coordinates::new(place.latitude, place.longitude)
        .map(|_| place)
        .map_err(|e| GeocodeFailure::ServiceError(format!("provider returned {e}")))
}
