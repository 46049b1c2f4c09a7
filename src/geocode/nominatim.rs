//! OpenStreetMap Nominatim provider (`/search`, `format=jsonv2`).

use serde::Deserialize;
use std::time::Duration;

use super::{fetch_body, http_client, GeocodeFailure, GeocodeFuture, Geocoder, Place};
use crate::config::GeocoderConfig;

pub struct NominatimGeocoder {
    client: reqwest::Client,
    endpoint: String,
    country_code: Option<String>,
    timeout: Duration,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    lat: String,
    lon: String,
    #[serde(default)]
    display_name: String,
}

impl NominatimGeocoder {
    pub fn new(config: &GeocoderConfig) -> anyhow::Result<Self> {
        Ok(Self {
            client: http_client(config)?,
            endpoint: format!("{}/search", config.endpoint()),
            country_code: config
                .country_code
                .as_deref()
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(str::to_lowercase),
            timeout: config.timeout(),
        })
    }

    fn search_url(&self, query: &str) -> Result<reqwest::Url, GeocodeFailure> {
        let mut params = vec![("q", query), ("format", "jsonv2"), ("limit", "1")];
        if let Some(cc) = &self.country_code {
            params.push(("countrycodes", cc.as_str()));
        }
        reqwest::Url::parse_with_params(&self.endpoint, &params)
            .map_err(|e| GeocodeFailure::ServiceError(format!("invalid endpoint: {e}")))
    }

    async fn search(&self, query: &str) -> Result<Place, GeocodeFailure> {
        let url = self.search_url(query)?;
        let body = fetch_body(&self.client, url, self.timeout).await?;
        parse_response(query, &body)
    }
}

fn parse_response(query: &str, body: &str) -> Result<Place, GeocodeFailure> {
    let hits: Vec<SearchHit> = serde_json::from_str(body)
        .map_err(|e| GeocodeFailure::ServiceError(format!("malformed response: {e}")))?;

    let hit = hits
        .into_iter()
        .next()
        .ok_or_else(|| GeocodeFailure::NotFound(query.to_string()))?;

    let parse = |value: &str| {
        value
            .trim()
            .parse::<f64>()
            .map_err(|_| GeocodeFailure::ServiceError(format!("non-numeric coordinate '{value}'")))
    };

    Ok(Place {
        latitude: parse(&hit.lat)?,
        longitude: parse(&hit.lon)?,
        address: hit.display_name,
    })
}

impl Geocoder for NominatimGeocoder {
    fn name(&self) -> &'static str {
        "nominatim"
    }

    fn lookup<'a>(&'a self, query: &'a str) -> GeocodeFuture<'a> {
        Box::pin(self.search(query))
    }
}
