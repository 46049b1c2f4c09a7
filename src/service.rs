//! The search interface the agent layer depends on.
//!
//! [`LocationSearchService`] owns the shared connection and the geocoder
//! adapter. Geocoding and searching are independent stages: the geocoder is
//! awaited without holding the connection, and each registry query runs on
//! the blocking pool holding the lock only for that query.

use rusqlite::Connection;
use serde::Serialize;
use std::sync::{Arc, Mutex};

use crate::config::SearchConfig;
use crate::error::{LocateError, Result, ValidationError};
use crate::facility::format::FacilityRecord;
use crate::facility::proximity::{ProximityQuery, MAX_RADIUS_KM, MAX_RESULTS};
use crate::facility::region::RegionFilter;
use crate::facility::stats::{registry_stats, RegistryStats};
use crate::facility::types::{Coordinates, SearchStatus};
use crate::facility::{lookup_records, ClinicRegistry, HospitalRegistry};
use crate::geocode::{GeocodeResult, GeocoderAdapter};

/// Response from find_nearby_clinics.
#[derive(Debug, Clone, Serialize)]
pub struct NearbyResponse {
    pub status: SearchStatus,
    pub origin: Coordinates,
    /// The effective radius after clamping.
    pub radius_km: f64,
    pub total: usize,
    pub results: Vec<FacilityRecord>,
    /// Set when nothing was found below the maximum radius.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_radius_km: Option<f64>,
}

/// Response from search_hospital_referrals and search_facilities_by_county.
#[derive(Debug, Clone, Serialize)]
pub struct ReferralResponse {
    pub status: SearchStatus,
    pub total: usize,
    pub results: Vec<FacilityRecord>,
}

impl ReferralResponse {
    fn from_records(results: Vec<FacilityRecord>) -> Self {
        Self {
            status: SearchStatus::from_count(results.len()),
            total: results.len(),
            results,
        }
    }
}

pub struct LocationSearchService {
    db: Arc<Mutex<Connection>>,
    geocoder: GeocoderAdapter,
    search: SearchConfig,
}

impl LocationSearchService {
    pub fn new(
        db: Arc<Mutex<Connection>>,
        geocoder: GeocoderAdapter,
        search: SearchConfig,
    ) -> Self {
        Self {
            db,
            geocoder,
            search,
        }
    }

    /// Resolve a free-text location. Failures are reported in the result.
    pub async fn geocode(&self, location: &str) -> GeocodeResult {
        self.geocoder.geocode(location).await
    }

    /// Clinics around a point, nearest first. `radius_km` defaults to the
    /// configured radius and is clamped into `[1, 50]`.
    pub async fn find_nearby(
        &self,
        latitude: f64,
        longitude: f64,
        radius_km: Option<f64>,
    ) -> Result<NearbyResponse> {
        let radius_km = radius_km.unwrap_or(self.search.default_radius_km);
        let query = ProximityQuery::new(latitude, longitude, radius_km, MAX_RESULTS)?;

        let results = self
            .with_conn(move |conn| lookup_records(&ClinicRegistry, conn, &query))
            .await?;

        let suggested_radius_km =
            (results.is_empty() && query.radius_km() < MAX_RADIUS_KM).then_some(MAX_RADIUS_KM);

        tracing::info!(
            latitude,
            longitude,
            radius_km = query.radius_km(),
            results = results.len(),
            "find_nearby"
        );

        Ok(NearbyResponse {
            status: SearchStatus::from_count(results.len()),
            origin: query.origin(),
            radius_km: query.radius_km(),
            total: results.len(),
            results,
            suggested_radius_km,
        })
    }

    /// Hospitals matching administrative and attribute filters.
    pub async fn search_by_region(&self, mut filter: RegionFilter) -> Result<ReferralResponse> {
        filter.limit = Some(filter.limit.unwrap_or(self.search.referral_limit));
        self.run_region(filter).await
    }

    /// All facilities in a county, optionally of one type.
    pub async fn facilities_in_county(
        &self,
        county: &str,
        facility_type: Option<String>,
        limit: Option<usize>,
    ) -> Result<ReferralResponse> {
        if county.trim().is_empty() {
            return Err(ValidationError::Empty { field: "county" }.into());
        }
        let filter = RegionFilter {
            county: Some(county.to_string()),
            facility_type,
            limit: Some(limit.unwrap_or(self.search.county_limit)),
            ..Default::default()
        };
        self.run_region(filter).await
    }

    /// Registry statistics, hospitals optionally restricted to a county.
    pub async fn statistics(&self, county: Option<String>) -> Result<RegistryStats> {
        self.with_conn(move |conn| registry_stats(conn, county.as_deref()))
            .await
    }

    async fn run_region(&self, filter: RegionFilter) -> Result<ReferralResponse> {
        let clause = filter.location_clause();
        let results = self
            .with_conn(move |conn| lookup_records(&HospitalRegistry, conn, &filter))
            .await?;

        tracing::info!(clause = ?clause, results = results.len(), "search_by_region");
        Ok(ReferralResponse::from_records(results))
    }

    /// Run a query on the blocking pool with the connection locked.
    async fn with_conn<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let db = Arc::clone(&self.db);
        tokio::task::spawn_blocking(move || {
            let conn = db.lock().map_err(|_| LocateError::LockPoisoned)?;
            f(&conn)
        })
        .await?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GeocoderConfig;
    use crate::geocode::testing::StubGeocoder;
    use crate::geocode::FailureReason;

    fn service() -> LocationSearchService {
        let conn = crate::db::open_memory_database().unwrap();
        conn.execute_batch(
            "INSERT INTO clinics (clinic_name, latitude, longitude) VALUES
                ('Near', -1.2559, 36.8167),
                ('Far', -0.8620, 36.8167),
                ('Unplaced', NULL, NULL);
             INSERT INTO hospital_referrals (code, facility_name, county, ward, facility_type) VALUES
                ('1', 'Mbagathi County Hospital', 'Nairobi', 'Woodley', 'Hospital'),
                ('2', 'Kiambu Level 5 Hospital', 'Kiambu', 'Township', 'Hospital'),
                ('3', 'Ruaka Dispensary', 'Kiambu', 'Ndenderu', 'Dispensary');",
        )
        .unwrap();
        let stub = Arc::new(StubGeocoder::found(-1.2667, 36.8167, "Nairobi, Kenya"));
        LocationSearchService::new(
            Arc::new(Mutex::new(conn)),
            GeocoderAdapter::new(stub, &GeocoderConfig::default()),
            SearchConfig::default(),
        )
    }

    #[tokio::test]
    async fn find_nearby_default_radius() {
        let response = service().find_nearby(-1.2667, 36.8167, None).await.unwrap();
        assert_eq!(response.status, SearchStatus::Found);
        assert_eq!(response.radius_km, 20.0);
        assert_eq!(response.results.len(), 1);
        assert_eq!(response.results[0].name, "Near");
        assert_eq!(response.results[0].distance_km, Some(1.2));
        assert!(response.suggested_radius_km.is_none());
    }

    #[tokio::test]
    async fn radius_above_maximum_behaves_as_fifty() {
        let response = service().find_nearby(-1.2667, 36.8167, Some(500.0)).await.unwrap();
        assert_eq!(response.radius_km, 50.0);
        assert_eq!(response.results.len(), 2);
        assert!(response.results[0].distance_km <= response.results[1].distance_km);
    }

    #[tokio::test]
    async fn empty_result_suggests_widening() {
        let response = service().find_nearby(3.1, 35.6, Some(20.0)).await.unwrap();
        assert_eq!(response.status, SearchStatus::NoResults);
        assert_eq!(response.suggested_radius_km, Some(50.0));

        let response = service().find_nearby(3.1, 35.6, Some(50.0)).await.unwrap();
        assert!(response.suggested_radius_km.is_none());
    }

    #[tokio::test]
    async fn invalid_origin_is_validation_error() {
        let err = service().find_nearby(200.0, 36.8, Some(20.0)).await.unwrap_err();
        assert!(err.is_validation());
    }

    #[tokio::test]
    async fn geocode_then_search() {
        let svc = service();
        let place = svc.geocode("Nairobi CBD").await;
        assert!(place.success);
        let origin = place.coordinates().unwrap();
        let response = svc
            .find_nearby(origin.latitude, origin.longitude, None)
            .await
            .unwrap();
        assert_eq!(response.total, 1);
    }

    #[tokio::test]
    async fn geocode_empty_input_fails_softly() {
        let result = service().geocode("").await;
        assert!(!result.success);
        assert_eq!(result.reason, Some(FailureReason::NotFound));
    }

    #[tokio::test]
    async fn region_search_uses_configured_limit() {
        let response = service().search_by_region(RegionFilter::default()).await.unwrap();
        assert_eq!(response.total, 3);
        assert_eq!(response.results[0].name, "Kiambu Level 5 Hospital");
    }

    #[tokio::test]
    async fn region_search_no_match_is_no_results() {
        let response = service()
            .search_by_region(RegionFilter::for_county("Turkana"))
            .await
            .unwrap();
        assert_eq!(response.status, SearchStatus::NoResults);
        assert!(response.results.is_empty());
    }

    #[tokio::test]
    async fn county_listing_filters_type() {
        let response = service()
            .facilities_in_county("Kiambu", Some("Dispensary".into()), None)
            .await
            .unwrap();
        assert_eq!(response.total, 1);
        assert_eq!(response.results[0].name, "Ruaka Dispensary");

        let err = service().facilities_in_county(" ", None, None).await.unwrap_err();
        assert!(err.is_validation());
    }

    #[tokio::test]
    async fn statistics_by_county() {
        let stats = service().statistics(Some("Kiambu".into())).await.unwrap();
        assert_eq!(stats.hospitals.total, 2);
        assert_eq!(stats.clinics.total, 3);
    }
}
