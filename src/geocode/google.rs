//! Google Geocoding API provider (`/maps/api/geocode/json`).

use anyhow::Context;
use serde::Deserialize;
use std::time::Duration;

use super::{fetch_body, http_client, GeocodeFailure, GeocodeFuture, Geocoder, Place};
use crate::config::GeocoderConfig;

pub struct GoogleGeocoder {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    region: Option<String>,
    timeout: Duration,
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    status: String,
    #[serde(default)]
    results: Vec<GeocodeHit>,
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeocodeHit {
    #[serde(default)]
    formatted_address: String,
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: LatLng,
}

#[derive(Debug, Deserialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}

impl GoogleGeocoder {
    pub fn new(config: &GeocoderConfig) -> anyhow::Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .context("google geocoder requires geocoder.api_key (or KLINIKI_GEOCODER_KEY)")?;

        Ok(Self {
            client: http_client(config)?,
            endpoint: format!("{}/maps/api/geocode/json", config.endpoint()),
            api_key,
            region: config.country_code.clone().filter(|c| !c.trim().is_empty()),
            timeout: config.timeout(),
        })
    }

    fn geocode_url(&self, query: &str) -> Result<reqwest::Url, GeocodeFailure> {
        let mut params = vec![("address", query), ("key", self.api_key.as_str())];
        if let Some(region) = &self.region {
            params.push(("region", region.as_str()));
        }
        reqwest::Url::parse_with_params(&self.endpoint, &params)
            .map_err(|e| GeocodeFailure::ServiceError(format!("invalid endpoint: {e}")))
    }

    async fn geocode(&self, query: &str) -> Result<Place, GeocodeFailure> {
        let url = self.geocode_url(query)?;
        let body = fetch_body(&self.client, url, self.timeout).await?;
        parse_response(query, &body)
    }
}

fn parse_response(query: &str, body: &str) -> Result<Place, GeocodeFailure> {
    let response: GeocodeResponse = serde_json::from_str(body)
        .map_err(|e| GeocodeFailure::ServiceError(format!("malformed response: {e}")))?;

    match response.status.as_str() {
        "OK" => {}
        "ZERO_RESULTS" => return Err(GeocodeFailure::NotFound(query.to_string())),
        other => {
            let detail = response
                .error_message
                .map(|m| format!("{other}: {m}"))
                .unwrap_or_else(|| other.to_string());
            return Err(GeocodeFailure::ServiceError(detail));
        }
    }

    let hit = response
        .results
        .into_iter()
        .next()
        .ok_or_else(|| GeocodeFailure::NotFound(query.to_string()))?;

    Ok(Place {
        latitude: hit.geometry.location.lat,
        longitude: hit.geometry.location.lng,
        address: hit.formatted_address,
    })
}

impl Geocoder for GoogleGeocoder {
    fn name(&self) -> &'static str {
        "google"
    }

    fn lookup<'a>(&'a self, query: &'a str) -> GeocodeFuture<'a> {
        Box::pin(self.geocode(query))
    }
}
