//! Proximity search over the clinic registry.
//!
//! A single call is deterministic: validate, clamp the radius, fetch the
//! latitude band that can possibly be in range, compute great-circle
//! distances, filter, sort by `(distance, id)`, truncate. There is no hidden
//! widening; callers that get nothing at 20 km re-issue the query at 50 km.

use rusqlite::Connection;
use serde::Serialize;

use super::clinics;
use super::types::{Clinic, Coordinates};
use crate::error::{Result, ValidationError};

/// Mean Earth radius used for every distance in this crate.
pub const EARTH_RADIUS_KM: f64 = 6371.0;
pub const DEFAULT_RADIUS_KM: f64 = 20.0;
pub const MIN_RADIUS_KM: f64 = 1.0;
pub const MAX_RADIUS_KM: f64 = 50.0;
/// Maximum (and default) number of clinics returned per call.
pub const MAX_RESULTS: usize = 10;

/// Great-circle distance in kilometres via the spherical law of cosines.
pub fn great_circle_km(a: Coordinates, b: Coordinates) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let delta_lon = (b.longitude - a.longitude).to_radians();

    // Rounding can push the cosine a hair past ±1 for coincident points
    let cos_angle = (lat1.sin() * lat2.sin() + lat1.cos() * lat2.cos() * delta_lon.cos())
        .clamp(-1.0, 1.0);

    EARTH_RADIUS_KM * cos_angle.acos()
}

/// Clamp a radius into `[MIN_RADIUS_KM, MAX_RADIUS_KM]`. Non-finite values are
/// malformed and rejected.
pub fn clamp_radius(radius_km: f64) -> std::result::Result<f64, ValidationError> {
    if !radius_km.is_finite() {
        return Err(ValidationError::Radius(radius_km));
    }
    Ok(radius_km.clamp(MIN_RADIUS_KM, MAX_RADIUS_KM))
}

/// A validated proximity request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProximityQuery {
    origin: Coordinates,
    radius_km: f64,
    limit: usize,
}

impl ProximityQuery {
    /// Validate the origin, clamp the radius into `[1, 50]` and the limit into
    /// `[1, 10]`.
    pub fn new(
        latitude: f64,
        longitude: f64,
        radius_km: f64,
        limit: usize,
    ) -> std::result::Result<Self, ValidationError> {
        let origin = Coordinates::new(latitude, longitude)?;
        let radius_km = clamp_radius(radius_km)?;
        Ok(Self {
            origin,
            radius_km,
            limit: limit.clamp(1, MAX_RESULTS),
        })
    }

    /// Default radius (20 km) and limit (10).
    pub fn around(latitude: f64, longitude: f64) -> std::result::Result<Self, ValidationError> {
        Self::new(latitude, longitude, DEFAULT_RADIUS_KM, MAX_RESULTS)
    }

    pub fn origin(&self) -> Coordinates {
        self.origin
    }

    /// The effective (clamped) radius.
    pub fn radius_km(&self) -> f64 {
        self.radius_km
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Latitude interval that contains every point within the radius.
    ///
    /// Surface distance is never less than `R * |Δlatitude|`, so nothing in
    /// range can fall outside this band.
    fn latitude_band(&self) -> (f64, f64) {
        let delta = (self.radius_km / EARTH_RADIUS_KM).to_degrees() + 1e-6;
        (
            (self.origin.latitude - delta).max(-90.0),
            (self.origin.latitude + delta).min(90.0),
        )
    }
}

/// A clinic within range, with its distance from the query origin.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NearbyClinic {
    pub clinic: Clinic,
    pub distance_km: f64,
}

/// Rank placed clinics within `query.radius_km()` of the origin.
pub fn find_nearby(conn: &Connection, query: &ProximityQuery) -> Result<Vec<NearbyClinic>> {
    let (min_lat, max_lat) = query.latitude_band();
    let candidates = clinics::fetch_in_latitude_band(conn, min_lat, max_lat)?;
    let scanned = candidates.len();

    let mut hits: Vec<NearbyClinic> = candidates
        .into_iter()
        .filter_map(|clinic| {
            let position = clinic.coordinates?;
            let distance_km = great_circle_km(query.origin, position);
            (distance_km <= query.radius_km).then_some(NearbyClinic {
                clinic,
                distance_km,
            })
        })
        .collect();

    hits.sort_by(|a, b| {
        a.distance_km
            .total_cmp(&b.distance_km)
            .then_with(|| a.clinic.id.cmp(&b.clinic.id))
    });
    let in_range = hits.len();
    hits.truncate(query.limit);

    tracing::debug!(
        scanned,
        in_range,
        returned = hits.len(),
        radius_km = query.radius_km,
        "proximity search"
    );

    Ok(hits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facility::clinics::{insert_clinic, ClinicInput};

    const NAIROBI: (f64, f64) = (-1.2667, 36.8167);

    fn test_db() -> Connection {
        crate::db::open_memory_database().unwrap()
    }

    fn add(conn: &Connection, name: &str, lat: f64, lon: f64) -> i64 {
        insert_clinic(
            conn,
            &ClinicInput {
                name: name.into(),
                latitude: Some(lat),
                longitude: Some(lon),
                ..Default::default()
            },
        )
        .unwrap()
        .id
    }

    fn point(lat: f64, lon: f64) -> Coordinates {
        Coordinates::new(lat, lon).unwrap()
    }

    #[test]
    fn distance_of_identical_points_is_zero() {
        let p = point(NAIROBI.0, NAIROBI.1);
        assert_eq!(great_circle_km(p, p), 0.0);
    }

    #[test]
    fn one_degree_of_latitude_is_about_111_km() {
        let d = great_circle_km(point(0.0, 0.0), point(1.0, 0.0));
        assert!((d - 111.195).abs() < 0.01, "got {d}");
    }

    #[test]
    fn nairobi_to_mombasa_is_about_440_km() {
        let d = great_circle_km(point(-1.2921, 36.8219), point(-4.0435, 39.6682));
        assert!((d - 440.0).abs() < 5.0, "got {d}");
    }

    #[test]
    fn distance_is_symmetric() {
        let a = point(-0.0917, 34.768);
        let b = point(0.5143, 35.2698);
        assert!((great_circle_km(a, b) - great_circle_km(b, a)).abs() < 1e-9);
    }

    #[test]
    fn radius_is_clamped() {
        assert_eq!(clamp_radius(500.0).unwrap(), MAX_RADIUS_KM);
        assert_eq!(clamp_radius(0.2).unwrap(), MIN_RADIUS_KM);
        assert_eq!(clamp_radius(-5.0).unwrap(), MIN_RADIUS_KM);
        assert_eq!(clamp_radius(20.0).unwrap(), 20.0);
        assert!(clamp_radius(f64::NAN).is_err());
        assert!(clamp_radius(f64::INFINITY).is_err());
    }

    #[test]
    fn query_rejects_invalid_origin() {
        assert_eq!(
            ProximityQuery::new(200.0, 36.8, 20.0, 10),
            Err(ValidationError::Latitude(200.0))
        );
        assert_eq!(
            ProximityQuery::new(-1.2, -190.0, 20.0, 10),
            Err(ValidationError::Longitude(-190.0))
        );
    }

    #[test]
    fn query_clamps_limit() {
        let q = ProximityQuery::new(0.0, 0.0, 20.0, 500).unwrap();
        assert_eq!(q.limit(), MAX_RESULTS);
        let q = ProximityQuery::new(0.0, 0.0, 20.0, 0).unwrap();
        assert_eq!(q.limit(), 1);
    }

    #[test]
    fn band_covers_radius() {
        let q = ProximityQuery::new(NAIROBI.0, NAIROBI.1, 50.0, 10).unwrap();
        let (min_lat, max_lat) = q.latitude_band();
        let edge = great_circle_km(point(min_lat, NAIROBI.1), q.origin());
        assert!(edge >= 50.0);
        assert!(max_lat > NAIROBI.0);
    }

    #[test]
    fn band_is_clipped_at_the_poles() {
        let q = ProximityQuery::new(89.9, 0.0, 50.0, 10).unwrap();
        let (_, max_lat) = q.latitude_band();
        assert_eq!(max_lat, 90.0);
    }

    #[test]
    fn returns_only_clinics_in_range_nearest_first() {
        let conn = test_db();
        let near = add(&conn, "Near", NAIROBI.0 + 0.0108, NAIROBI.1);
        add(&conn, "Far", NAIROBI.0 + 0.4047, NAIROBI.1);

        let q = ProximityQuery::new(NAIROBI.0, NAIROBI.1, 20.0, 10).unwrap();
        let hits = find_nearby(&conn, &q).unwrap();

        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].clinic.id, near);
        assert!((hits[0].distance_km - 1.2).abs() < 0.01);
    }

    #[test]
    fn ties_are_broken_by_id() {
        let conn = test_db();
        // Same latitude offset north and south: equal distances
        let first = add(&conn, "North", NAIROBI.0 + 0.05, NAIROBI.1);
        let second = add(&conn, "South", NAIROBI.0 - 0.05, NAIROBI.1);

        let q = ProximityQuery::new(NAIROBI.0, NAIROBI.1, 20.0, 10).unwrap();
        let hits = find_nearby(&conn, &q).unwrap();
        let ids: Vec<i64> = hits.iter().map(|h| h.clinic.id).collect();
        assert_eq!(ids, vec![first, second]);
    }

    #[test]
    fn truncates_to_limit() {
        let conn = test_db();
        for i in 0..15 {
            add(&conn, &format!("Clinic {i}"), NAIROBI.0 + 0.001 * i as f64, NAIROBI.1);
        }
        let q = ProximityQuery::new(NAIROBI.0, NAIROBI.1, 20.0, 10).unwrap();
        let hits = find_nearby(&conn, &q).unwrap();
        assert_eq!(hits.len(), 10);
        assert_eq!(hits[0].clinic.name, "Clinic 0");
    }

    #[test]
    fn empty_registry_is_not_an_error() {
        let conn = test_db();
        let query = ProximityQuery::around(NAIROBI.0, NAIROBI.1).unwrap();
        let hits = find_nearby(&conn, &query).unwrap();
        assert!(hits.is_empty());
    }
}
