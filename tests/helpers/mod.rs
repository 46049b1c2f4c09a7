#![allow(dead_code)]

use kliniki::db;
use kliniki::facility::clinics::{insert_clinic, ClinicInput};
use kliniki::facility::hospitals::{upsert_hospital, HospitalInput};
use rusqlite::Connection;

/// Reference origin used across the proximity tests (Nairobi CBD).
pub const NAIROBI: (f64, f64) = (-1.2667, 36.8167);

/// Open a fresh in-memory database with schema and migrations applied.
pub fn test_db() -> Connection {
    db::open_memory_database().unwrap()
}

/// Insert a clinic with a location. Returns the clinic id.
pub fn insert_placed_clinic(conn: &Connection, name: &str, latitude: f64, longitude: f64) -> i64 {
    insert_clinic(
        conn,
        &ClinicInput {
            name: name.into(),
            services: Some("General outpatient".into()),
            latitude: Some(latitude),
            longitude: Some(longitude),
            source_country: Some("Kenya".into()),
            ..Default::default()
        },
    )
    .unwrap()
    .id
}

/// Insert a clinic with no coordinates. Returns the clinic id.
pub fn insert_unplaced_clinic(conn: &Connection, name: &str) -> i64 {
    insert_clinic(
        conn,
        &ClinicInput {
            name: name.into(),
            ..Default::default()
        },
    )
    .unwrap()
    .id
}

/// Insert a hospital with its full administrative path.
pub fn insert_hospital(
    conn: &Connection,
    code: &str,
    name: &str,
    path: [&str; 4],
    facility_type: &str,
    keph_level: &str,
) {
    let [county, sub_county, constituency, ward] = path;
    upsert_hospital(
        conn,
        &HospitalInput {
            code: code.into(),
            name: name.into(),
            county: Some(county.into()),
            sub_county: Some(sub_county.into()),
            constituency: Some(constituency.into()),
            ward: Some(ward.into()),
            facility_type: Some(facility_type.into()),
            keph_level: Some(keph_level.into()),
            owner: Some("Ministry of Health".into()),
            ..Default::default()
        },
    )
    .unwrap();
}

/// A small hospital registry spanning two counties.
#[rustfmt::skip]
pub fn seed_hospitals(conn: &Connection) {
    let rows: [(&str, &str, [&str; 4], &str, &str); 7] = [
        ("13023", "Kenyatta National Hospital", ["Nairobi", "Dagoretti North", "Dagoretti North", "Kilimani"], "National Referral Hospital", "Level 6"),
        ("13074", "Mbagathi County Hospital", ["Nairobi", "Kibra", "Kibra", "Woodley"], "Hospital", "Level 4"),
        ("13123", "Kibera South Health Centre", ["Nairobi", "Kibra", "Kibra", "Sarang'ombe"], "Health Centre", "Level 3"),
        ("18393", "Mama Lucy Kibaki Hospital", ["Nairobi", "Embakasi", "Embakasi West", "Umoja I"], "Hospital", "Level 5"),
        ("10603", "Kiambu Level 5 Hospital", ["Kiambu", "Kiambu Town", "Kiambu", "Township"], "Hospital", "Level 5"),
        ("10890", "Thika Level 5 Hospital", ["Kiambu", "Thika Town", "Thika Town", "Township"], "Hospital", "Level 5"),
        ("11778", "Ruaka Dispensary", ["Kiambu", "Kiambaa", "Kiambaa", "Ndenderu"], "Dispensary", "Level 2"),
    ];
    for (code, name, path, kind, level) in rows {
        insert_hospital(conn, code, name, path, kind, level);
    }
}
