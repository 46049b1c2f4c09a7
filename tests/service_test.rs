//! End-to-end: configured geocoder against a local stub, then both searches.

mod helpers;

use axum::extract::Query;
use axum::routing::get;
use axum::Router;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use helpers::{insert_placed_clinic, seed_hospitals, test_db};
use kliniki::config::KlinikiConfig;
use kliniki::facility::region::RegionFilter;
use kliniki::facility::types::SearchStatus;
use kliniki::geocode::{create_geocoder, FailureReason, GeocoderAdapter};
use kliniki::service::LocationSearchService;

async fn nominatim_stub() -> String {
    async fn search(Query(params): Query<HashMap<String, String>>) -> String {
        match params.get("q").map(String::as_str) {
            Some("Kibera, Kenya") => {
                r#"[{"lat": "-1.3133", "lon": "36.7876", "display_name": "Kibera, Nairobi, Kenya"}]"#.into()
            }
            _ => "[]".into(),
        }
    }

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, Router::new().route("/search", get(search)))
            .await
            .unwrap();
    });
    format!("http://{addr}")
}

async fn service() -> LocationSearchService {
    let mut config = KlinikiConfig::default();
    config.geocoder.base_url = Some(nominatim_stub().await);
    config.geocoder.timeout_secs = 2;

    let conn = test_db();
    seed_hospitals(&conn);
    insert_placed_clinic(&conn, "Kibera Community Clinic", -1.3120, 36.7890);
    insert_placed_clinic(&conn, "Karen Clinic", -1.3190, 36.7070);

    let provider = create_geocoder(&config.geocoder).unwrap();
    LocationSearchService::new(
        Arc::new(Mutex::new(conn)),
        GeocoderAdapter::new(provider, &config.geocoder),
        config.search.clone(),
    )
}

#[tokio::test]
async fn geocode_then_find_nearby() {
    let svc = service().await;

    let place = svc.geocode("Kibera").await;
    assert!(place.success, "{place:?}");
    assert_eq!(place.address.as_deref(), Some("Kibera, Nairobi, Kenya"));

    let origin = place.coordinates().unwrap();
    let nearby = svc
        .find_nearby(origin.latitude, origin.longitude, Some(5.0))
        .await
        .unwrap();
    assert_eq!(nearby.status, SearchStatus::Found);
    assert_eq!(nearby.total, 1);
    assert_eq!(nearby.results[0].name, "Kibera Community Clinic");

    let wider = svc
        .find_nearby(origin.latitude, origin.longitude, Some(20.0))
        .await
        .unwrap();
    assert_eq!(wider.total, 2);
}

#[tokio::test]
async fn nonsense_location_is_not_found() {
    let svc = service().await;
    let place = svc.geocode("zzqqxx").await;
    assert!(!place.success);
    assert_eq!(place.reason, Some(FailureReason::NotFound));

    let empty = svc.geocode("").await;
    assert_eq!(empty.reason, Some(FailureReason::NotFound));
}

#[tokio::test]
async fn unreachable_geocoder_is_service_error() {
    let mut config = KlinikiConfig::default();
    // Nothing listens on the discard port
    config.geocoder.base_url = Some("http://127.0.0.1:9".into());
    config.geocoder.timeout_secs = 2;
    let provider = create_geocoder(&config.geocoder).unwrap();
    let adapter = GeocoderAdapter::new(provider, &config.geocoder);

    let result = adapter.geocode("Kibera").await;
    assert!(!result.success);
    assert_eq!(result.reason, Some(FailureReason::ServiceError));
}

#[tokio::test]
async fn referral_search_through_service() {
    let svc = service().await;
    let response = svc
        .search_by_region(RegionFilter {
            county: Some("Nairobi".into()),
            facility_type: Some("Hospital".into()),
            limit: Some(5),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(response.status, SearchStatus::Found);
    assert_eq!(response.total, 3);
    assert!(response.results.iter().all(|r| r.keph_level.is_some()));

    let kiambu = svc.facilities_in_county("Kiambu", None, None).await.unwrap();
    assert_eq!(kiambu.total, 3);
}
