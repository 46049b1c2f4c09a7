use std::io::Write;

use kliniki::db::{check_database_health, open_database};
use kliniki::import::{import_snapshot, ImportMode, Snapshot};

const SNAPSHOT: &str = r#"{
    "clinics": [
        {"Clinic Name": "Marie Stopes Eastleigh", "Services": "Family planning", "Category": "Reproductive health",
         "Location": "Eastleigh, Nairobi", "Phone_Combined": "0700 000 000", "Latitude": -1.2741, "Longitude": 36.8467,
         "source_co": "Kenya"},
        {"Clinic Name": "Kisumu Youth Centre", "Latitude": -0.0917, "Longitude": 34.768, "source_co": "Kenya"},
        {"Clinic Name": "No Coordinates Clinic", "source_co": "Kenya"}
    ],
    "hospitals": [
        {"Code": "13023", "Name": "Kenyatta National Hospital", "County": "Nairobi", "Sub County": "Dagoretti North",
         "Constituency": "Dagoretti North", "Ward": "Kilimani", "Facility type": "National Referral Hospital",
         "Keph level": "Level 6", "Owner": "Ministry of Health", "Beds": 1800, "Cots": 200,
         "Operational status": "Operational"}
    ]
}"#;

#[test]
fn snapshot_file_round_trip_into_searchable_registries() {
    let dir = tempfile::tempdir().unwrap();
    let mut file = tempfile::NamedTempFile::new_in(dir.path()).unwrap();
    file.write_all(SNAPSHOT.as_bytes()).unwrap();

    let json = std::fs::read_to_string(file.path()).unwrap();
    let snapshot: Snapshot = serde_json::from_str(&json).unwrap();

    let mut conn = open_database(dir.path().join("facilities.db")).unwrap();
    let summary = import_snapshot(&mut conn, &snapshot, ImportMode::Append, || {}).unwrap();
    assert_eq!(summary.clinics_imported, 3);
    assert_eq!(summary.clinics_unplaced, 1);
    assert_eq!(summary.hospitals_inserted, 1);

    let report = check_database_health(&conn).unwrap();
    assert_eq!(report.clinic_count, 3);
    assert_eq!(report.clinics_with_coordinates, 2);
    assert_eq!(report.hospital_count, 1);
    assert!(report.dataset_imported_at.is_some());

    let query = kliniki::facility::proximity::ProximityQuery::around(-1.2667, 36.8167).unwrap();
    let hits = kliniki::facility::proximity::find_nearby(&conn, &query).unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].clinic.name, "Marie Stopes Eastleigh");
    assert_eq!(hits[0].clinic.phone_combined.as_deref(), Some("0700 000 000"));

    let hospitals = kliniki::facility::region::search_by_region(
        &conn,
        &kliniki::facility::region::RegionFilter::for_county("nairobi"),
    )
    .unwrap();
    assert_eq!(hospitals[0].beds, Some(1800));
    assert_eq!(hospitals[0].operational_status.as_deref(), Some("Operational"));
}

#[test]
fn failed_import_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let mut conn = open_database(dir.path().join("facilities.db")).unwrap();

    // Table dropped mid-way forces a data store error on the hospital rows
    let snapshot: Snapshot = serde_json::from_str(SNAPSHOT).unwrap();
    conn.execute_batch("DROP TABLE hospital_referrals").unwrap();

    let result = import_snapshot(&mut conn, &snapshot, ImportMode::Append, || {});
    assert!(result.is_err());

    let clinics: i64 = conn
        .query_row("SELECT COUNT(*) FROM clinics", [], |r| r.get(0))
        .unwrap();
    assert_eq!(clinics, 0);
}
