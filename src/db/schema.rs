//! SQL DDL for both facility registries.
//!
//! Defines the `clinics` (coordinate-indexed), `hospital_referrals`
//! (administrative hierarchy) and `schema_meta` tables. All DDL uses
//! `IF NOT EXISTS` for idempotent initialization.

use rusqlite::Connection;

const SCHEMA_SQL: &str = r#"
-- Coordinate-indexed clinic registry
CREATE TABLE IF NOT EXISTS clinics (
    id INTEGER PRIMARY KEY,
    clinic_name TEXT NOT NULL,
    services TEXT,
    category TEXT,
    location TEXT,
    phone TEXT,
    phone_combined TEXT,
    email_combined TEXT,
    website TEXT,
    google_link TEXT,
    latitude REAL,
    longitude REAL,
    source_country TEXT,
    CHECK ((latitude IS NULL) = (longitude IS NULL)),
    CHECK (latitude IS NULL OR (latitude >= -90.0 AND latitude <= 90.0)),
    CHECK (longitude IS NULL OR (longitude >= -180.0 AND longitude <= 180.0))
);

CREATE INDEX IF NOT EXISTS idx_clinics_latitude ON clinics(latitude);
CREATE INDEX IF NOT EXISTS idx_clinics_country ON clinics(source_country);

-- Administrative-hierarchy hospital registry
CREATE TABLE IF NOT EXISTS hospital_referrals (
    code TEXT PRIMARY KEY,
    facility_name TEXT NOT NULL,
    county TEXT,
    sub_county TEXT,
    constituency TEXT,
    ward TEXT,
    facility_type TEXT,
    keph_level TEXT,
    owner TEXT,
    beds INTEGER,
    cots INTEGER,
    operational_status TEXT
);

-- Schema metadata
CREATE TABLE IF NOT EXISTS schema_meta (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
);
"#;

/// Initialize all schema tables. Idempotent (uses IF NOT EXISTS).
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA_SQL)?;

    // Set initial schema version if not already present
    conn.execute(
        "INSERT OR IGNORE INTO schema_meta (key, value) VALUES ('schema_version', '1')",
        [],
    )?;

    Ok(())
}
